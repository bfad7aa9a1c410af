use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum RelationCmd {
    #[command(about = "List every link-keyword relation")]
    List,
    #[command(
        about = "Relate a link with a keyword",
        long_about = "Create a link-keyword relation. Both rows must exist and the pair must not be related already."
    )]
    Add {
        #[arg(long = "link-id", value_name = "ID")]
        link_id: String,
        #[arg(long = "keyword-id", value_name = "ID")]
        keyword_id: String,
    },
    #[command(about = "Remove a link-keyword relation")]
    Delete {
        #[arg(long = "link-id", value_name = "ID")]
        link_id: String,
        #[arg(long = "keyword-id", value_name = "ID")]
        keyword_id: String,
    },
}
