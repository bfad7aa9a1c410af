use super::{emit, CommandRunner};
use crate::admin::models::KeywordRequest;
use crate::app::Services;
use crate::cli;
use anyhow::Result;

impl CommandRunner for cli::KeywordCmd {
    fn run(&self, services: &Services) -> Result<()> {
        let admin = &services.admin;
        match self {
            cli::KeywordCmd::List => emit(admin.list_keywords()),
            cli::KeywordCmd::Add { text } => emit(admin.create_keyword(&KeywordRequest {
                keyword_text: Some(text.clone()),
                ..Default::default()
            })),
            cli::KeywordCmd::Update { id, text } => emit(admin.update_keyword(
                id,
                &KeywordRequest {
                    keyword_text: Some(text.clone()),
                    ..Default::default()
                },
            )),
            cli::KeywordCmd::Delete { id } => emit(admin.delete_keyword(id)),
        }
    }
}
