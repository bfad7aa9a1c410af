use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum LinkCmd {
    #[command(about = "List every link")]
    List,
    #[command(about = "Create a link")]
    Add {
        #[arg(long, value_name = "URL", help = "Destination URL")]
        url: String,
        #[arg(long, value_name = "LABEL", help = "Text shown to the visitor")]
        label: String,
    },
    #[command(
        about = "Update a link",
        long_about = "Replace the URL and/or label of an existing link. Omitted fields keep their current value."
    )]
    Update {
        #[arg(long, value_name = "ID")]
        id: String,
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        #[arg(long, value_name = "LABEL")]
        label: Option<String>,
    },
    #[command(about = "Delete a link and its keyword relations")]
    Delete {
        #[arg(long, value_name = "ID")]
        id: String,
    },
}
