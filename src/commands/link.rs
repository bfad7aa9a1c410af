use super::{emit, CommandRunner};
use crate::admin::models::LinkRequest;
use crate::app::Services;
use crate::cli;
use anyhow::Result;

impl CommandRunner for cli::LinkCmd {
    fn run(&self, services: &Services) -> Result<()> {
        let admin = &services.admin;
        match self {
            cli::LinkCmd::List => emit(admin.list_links()),
            cli::LinkCmd::Add { url, label } => emit(admin.create_link(&LinkRequest {
                link_url: Some(url.clone()),
                link_label: Some(label.clone()),
                ..Default::default()
            })),
            cli::LinkCmd::Update { id, url, label } => emit(admin.update_link(
                id,
                &LinkRequest {
                    link_url: url.clone(),
                    link_label: label.clone(),
                    ..Default::default()
                },
            )),
            cli::LinkCmd::Delete { id } => emit(admin.delete_link(id)),
        }
    }
}
