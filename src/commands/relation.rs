use super::{emit, CommandRunner};
use crate::admin::models::AssociationRequest;
use crate::app::Services;
use crate::cli;
use anyhow::Result;
use serde_json::Value;

fn pair(link_id: &str, keyword_id: &str) -> AssociationRequest {
    AssociationRequest {
        link_id: Some(Value::String(link_id.to_string())),
        keyword_id: Some(Value::String(keyword_id.to_string())),
    }
}

impl CommandRunner for cli::RelationCmd {
    fn run(&self, services: &Services) -> Result<()> {
        let admin = &services.admin;
        match self {
            cli::RelationCmd::List => emit(admin.list_associations()),
            cli::RelationCmd::Add {
                link_id,
                keyword_id,
            } => emit(admin.create_association(&pair(link_id, keyword_id))),
            cli::RelationCmd::Delete {
                link_id,
                keyword_id,
            } => emit(admin.delete_association(&pair(link_id, keyword_id))),
        }
    }
}
