use clap::Parser;
use std::env;
use url::Url;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Keyword-to-link help desk: resolve visitor keywords into curated help links",
    long_about = "Stores help links, keywords and the associations between them in SQLite, serves the admin and search HTTP API, and runs one-shot administrative commands.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long,
        env = "LETMEHELP_DATA_DIR",
        default_value = ".letmehelp/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long = "log-file",
        env = "LETMEHELP_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "api-listen",
        env = "LETMEHELP_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8084",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long = "site-url",
        env = "LETMEHELP_SITE_URL",
        value_name = "URL",
        default_value = "http://localhost/",
        help = "Public site URL used to build content-page permalinks"
    )]
    pub site_url: Url,

    #[arg(
        long = "admin-token",
        env = "LETMEHELP_ADMIN_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        help = "Shared secret required by admin routes (x-api-key or Bearer)"
    )]
    pub admin_token: Option<String>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();
    Cli::parse()
}
