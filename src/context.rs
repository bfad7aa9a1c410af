use std::{net::SocketAddr, path::PathBuf};

use url::Url;

pub const DB_FILE: &str = "letmehelp.sqlite";

/// Runtime configuration, derived once from the parsed CLI.
#[derive(Clone, Debug)]
pub struct Context {
    pub data_dir: PathBuf,
    pub reset: bool,
    pub log_file: Option<PathBuf>,
    pub api_listen: SocketAddr,
    pub site_url: Url,
    pub admin_token: Option<String>,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            data_dir: PathBuf::from(&cli.data_dir),
            reset: cli.reset,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
            api_listen: cli.api_listen,
            site_url: cli.site_url.clone(),
            admin_token: cli
                .admin_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn blank_admin_token_means_open() {
        let cli = crate::cli::Cli::try_parse_from([
            "letmehelp",
            "--data-dir",
            "/srv/lmh",
            "--admin-token",
            " ",
        ])
        .unwrap();
        let ctx = Context::from_cli(&cli);
        assert_eq!(ctx.admin_token, None);
        assert_eq!(ctx.db_path(), PathBuf::from("/srv/lmh/letmehelp.sqlite"));
    }
}
