use anyhow::{Context, Result};
use serde::Serialize;

use crate::admin::{models::SearchRequest, AdminResult};
use crate::app::Services;
use crate::cli::Command;
use crate::rest::ErrorResponse;

pub mod keyword;
pub mod link;
pub mod relation;

pub trait CommandRunner {
    fn run(&self, services: &Services) -> Result<()>;
}

impl Command {
    pub fn run(&self, services: &Services) -> Result<()> {
        match self {
            Command::Link { cmd } => cmd.run(services),
            Command::Keyword { cmd } => cmd.run(services),
            Command::Relation { cmd } => cmd.run(services),
            Command::Search {
                keyword,
                post_id,
                editor,
            } => {
                let req = SearchRequest {
                    keyword_text: Some(keyword.clone()),
                    post_id: post_id.map(serde_json::Value::from),
                    mode: editor.then(|| "editor".to_string()),
                };
                emit(services.admin.search(&req))
            }
            Command::Uninstall => {
                services
                    .store
                    .uninstall()
                    .context("dropping letmehelp tables")?;
                log::info!("🧹 Tables dropped and schema versions cleared");
                print_json(&serde_json::json!({ "message": "Uninstalled." }))
            }
        }
    }
}

fn print_json<T: Serialize>(body: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(body).context("encoding response")?
    );
    Ok(())
}

/// Print the same JSON body the HTTP surface would return. Failures are
/// printed too and then reported as the command's error.
pub(crate) fn emit<T: Serialize>(result: AdminResult<T>) -> Result<()> {
    match result {
        Ok(body) => print_json(&body),
        Err(err) => {
            print_json(&ErrorResponse {
                message: err.to_string(),
            })?;
            Err(err.into())
        }
    }
}
