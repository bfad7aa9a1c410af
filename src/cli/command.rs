use clap::Subcommand;

use crate::cli::keyword_cmd::KeywordCmd;
use crate::cli::link_cmd::LinkCmd;
use crate::cli::relation_cmd::RelationCmd;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Help link management",
        long_about = "List, create, update and delete the help links shown to visitors. Deleting a link also removes its keyword relations."
    )]
    Link {
        #[command(subcommand)]
        cmd: LinkCmd,
    },
    #[command(
        about = "Keyword management",
        long_about = "List, create, update and delete the keywords visitors search for. Deleting a keyword also removes its link relations."
    )]
    Keyword {
        #[command(subcommand)]
        cmd: KeywordCmd,
    },
    #[command(
        about = "Link-keyword relation management",
        long_about = "List, create and delete the many-to-many relations between links and keywords."
    )]
    Relation {
        #[command(subcommand)]
        cmd: RelationCmd,
    },
    #[command(
        about = "Search links by keyword",
        long_about = "Resolve a keyword exactly as a visitor would and print the matching links together with the next-step URL."
    )]
    Search {
        #[arg(long, value_name = "TEXT", help = "Keyword text to resolve")]
        keyword: String,
        #[arg(
            long = "post-id",
            value_name = "ID",
            help = "Content page the visitor is forwarded to"
        )]
        post_id: Option<u64>,
        #[arg(
            long,
            default_value_t = false,
            help = "Editor preview mode (no next-step URL)"
        )]
        editor: bool,
    },
    #[command(
        about = "Drop all tables",
        long_about = "Drop the links, keywords and relation tables and forget their schema versions."
    )]
    Uninstall,
}
