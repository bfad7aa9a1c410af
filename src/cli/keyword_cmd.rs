use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum KeywordCmd {
    #[command(about = "List every keyword")]
    List,
    #[command(about = "Create a keyword")]
    Add {
        #[arg(long, value_name = "TEXT")]
        text: String,
    },
    #[command(about = "Change the text of a keyword")]
    Update {
        #[arg(long, value_name = "ID")]
        id: String,
        #[arg(long, value_name = "TEXT")]
        text: String,
    },
    #[command(about = "Delete a keyword and its link relations")]
    Delete {
        #[arg(long, value_name = "ID")]
        id: String,
    },
}
