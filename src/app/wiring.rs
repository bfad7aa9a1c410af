use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use url::Url;

use crate::{
    admin::AdminService, permalink::SitePermalinks, repository::Repository, resolver::Resolver,
    storage::SqliteStore,
};

pub fn init_storage(data_dir: &Path, db_path: &Path, reset: bool) -> Result<SqliteStore> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let sqlite = SqliteStore::new(db_path);
    if reset {
        sqlite.reset_all().context("resetting storage")?;
    }
    let report = sqlite.init().context("initializing storage")?;
    if report.is_noop() {
        log::info!("🗄️ Schema up to date");
    } else {
        log::info!("🗄️ Provisioned {} table(s)", report.provisioned.len());
    }
    Ok(sqlite)
}

/// Repository -> Resolver -> AdminService, all sharing one store handle.
pub fn build_admin(store: SqliteStore, site_url: Url) -> AdminService<SqliteStore> {
    let repository = Repository::new(store);
    let resolver = Resolver::new(repository.clone(), Arc::new(SitePermalinks::new(site_url)));
    AdminService::new(repository, resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::models::KeywordRequest;
    use tempfile::TempDir;

    #[test]
    fn reset_starts_from_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        let db_path = data_dir.join("letmehelp.sqlite");

        let store = init_storage(&data_dir, &db_path, false).unwrap();
        let admin = build_admin(store, Url::parse("http://localhost/").unwrap());
        admin
            .create_keyword(&KeywordRequest {
                keyword_text: Some("billing".to_string()),
                ..Default::default()
            })
            .unwrap();

        let store = init_storage(&data_dir, &db_path, false).unwrap();
        let admin = build_admin(store, Url::parse("http://localhost/").unwrap());
        assert_eq!(admin.list_keywords().unwrap().len(), 1);

        let store = init_storage(&data_dir, &db_path, true).unwrap();
        let admin = build_admin(store, Url::parse("http://localhost/").unwrap());
        assert!(admin.list_keywords().unwrap().is_empty());
    }
}
