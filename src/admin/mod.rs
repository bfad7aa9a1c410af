//! Administrative CRUD and public search, transport-agnostic.
//!
//! Inputs are sanitized and validated here; nothing malformed reaches the
//! repository. The REST layer and the one-shot CLI commands both call into
//! [`AdminService`].

mod error;
pub mod models;
pub mod validate;

pub use error::{AdminError, AdminResult};

use crate::{
    repository::{Fields, Repository, RepositoryError},
    resolver::{Resolver, SearchMode, SearchOutcome, SearchQuery},
    storage::{Column, Store, Table},
    types::{Association, Keyword, Link},
};

use models::{
    AssociationDeleted, AssociationRequest, KeywordRequest, LinkRequest, MutationResponse,
    SearchRequest, SearchResponse,
};
use validate::{json_id, optional_json_id, optional_text, parse_id, required_text};

const LINK_CREATED: &str = "Link created successfully.";
const LINK_CREATE_FAILED: &str = "Failed to create link.";
const LINK_UPDATED: &str = "Link updated successfully.";
const LINK_UPDATE_FAILED: &str = "Failed to update link.";
const LINK_DELETED: &str = "Link deleted successfully.";
const LINK_DELETE_FAILED: &str = "Failed to delete link.";
const LINKS_LIST_FAILED: &str = "Failed to fetch links.";

const KEYWORD_CREATED: &str = "Keyword created successfully.";
const KEYWORD_CREATE_FAILED: &str = "Failed to create keyword.";
const KEYWORD_UPDATED: &str = "Keyword updated successfully.";
const KEYWORD_UPDATE_FAILED: &str = "Failed to update keyword.";
const KEYWORD_DELETED: &str = "Keyword deleted successfully.";
const KEYWORD_DELETE_FAILED: &str = "Failed to delete keyword.";
const KEYWORDS_LIST_FAILED: &str = "Failed to fetch keywords.";

const RELATION_CREATED: &str = "Link-keyword relationship created successfully.";
const RELATION_CREATE_FAILED: &str = "Failed to create link-keyword relationship.";
const RELATION_EXISTS: &str = "Link-keyword relationship already exists.";
const RELATION_DELETED: &str = "Link keyword relation deleted successfully.";
const RELATION_DELETE_FAILED: &str = "Failed to delete link keyword relation.";
const RELATIONS_LIST_FAILED: &str = "Failed to fetch link keyword relations.";

const LINKS_FOUND: &str = "Links found successfully.";
const NO_LINKS_FOUND: &str = "No links found.";

#[derive(Clone)]
pub struct AdminService<S: Store> {
    repository: Repository<S>,
    resolver: Resolver<S>,
}

impl<S: Store> AdminService<S> {
    pub fn new(repository: Repository<S>, resolver: Resolver<S>) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    pub fn list_links(&self) -> AdminResult<Vec<Link>> {
        self.repository
            .links()
            .map_err(|err| AdminError::from_repository(err, LINKS_LIST_FAILED))
    }

    pub fn create_link(&self, req: &LinkRequest) -> AdminResult<MutationResponse> {
        let url = required_text("link_url", req.link_url.as_deref())?;
        let label = required_text("link_label", req.link_label.as_deref())?;

        let fields = Fields::new()
            .with(Column::LinkUrl, url)
            .with(Column::LinkLabel, label);
        let id = self
            .repository
            .insert(Table::Links, &fields)
            .map_err(|err| AdminError::from_repository(err, LINK_CREATE_FAILED))?;

        log::info!("🔗 Created link {}", id);
        Ok(MutationResponse {
            message: LINK_CREATED.to_string(),
            id,
        })
    }

    /// Replace url and label of link `path_id`; absent fields keep their stored value.
    pub fn update_link(&self, path_id: &str, req: &LinkRequest) -> AdminResult<MutationResponse> {
        let id = parse_id("id", path_id)?;
        ensure_same_id("link_id", id, optional_json_id("link_id", req.link_id.as_ref())?)?;
        let url = optional_text("link_url", req.link_url.as_deref())?;
        let label = optional_text("link_label", req.link_label.as_deref())?;

        let current = self
            .repository
            .link(id)
            .map_err(|err| AdminError::from_repository(err, LINK_UPDATE_FAILED))?
            .ok_or_else(|| {
                log::warn!("Link {} not found for update", id);
                AdminError::NotFound(LINK_UPDATE_FAILED.to_string())
            })?;

        let fields = Fields::new()
            .with(Column::LinkId, id)
            .with(Column::LinkUrl, url.unwrap_or(current.url))
            .with(Column::LinkLabel, label.unwrap_or(current.label));
        self.repository
            .update(Table::Links, &fields)
            .map_err(|err| AdminError::from_repository(err, LINK_UPDATE_FAILED))?;

        log::info!("🔗 Updated link {}", id);
        Ok(MutationResponse {
            message: LINK_UPDATED.to_string(),
            id,
        })
    }

    /// Delete link `path_id` along with every association that mentions it.
    pub fn delete_link(&self, path_id: &str) -> AdminResult<MutationResponse> {
        let id = parse_id("id", path_id)?;
        self.delete_entity(Table::Links, id, LINK_DELETE_FAILED)?;

        log::info!("🗑️ Deleted link {}", id);
        Ok(MutationResponse {
            message: LINK_DELETED.to_string(),
            id,
        })
    }

    pub fn list_keywords(&self) -> AdminResult<Vec<Keyword>> {
        self.repository
            .keywords()
            .map_err(|err| AdminError::from_repository(err, KEYWORDS_LIST_FAILED))
    }

    pub fn create_keyword(&self, req: &KeywordRequest) -> AdminResult<MutationResponse> {
        let text = required_text("keyword_text", req.keyword_text.as_deref())?;

        let id = self
            .repository
            .insert(Table::Keywords, &Fields::new().with(Column::KeywordText, text))
            .map_err(|err| AdminError::from_repository(err, KEYWORD_CREATE_FAILED))?;

        log::info!("🏷️ Created keyword {}", id);
        Ok(MutationResponse {
            message: KEYWORD_CREATED.to_string(),
            id,
        })
    }

    pub fn update_keyword(
        &self,
        path_id: &str,
        req: &KeywordRequest,
    ) -> AdminResult<MutationResponse> {
        let id = parse_id("id", path_id)?;
        ensure_same_id(
            "keyword_id",
            id,
            optional_json_id("keyword_id", req.keyword_id.as_ref())?,
        )?;
        let text = optional_text("keyword_text", req.keyword_text.as_deref())?;

        let current = self
            .repository
            .keyword(id)
            .map_err(|err| AdminError::from_repository(err, KEYWORD_UPDATE_FAILED))?
            .ok_or_else(|| {
                log::warn!("Keyword {} not found for update", id);
                AdminError::NotFound(KEYWORD_UPDATE_FAILED.to_string())
            })?;

        let fields = Fields::new()
            .with(Column::KeywordId, id)
            .with(Column::KeywordText, text.unwrap_or(current.text));
        self.repository
            .update(Table::Keywords, &fields)
            .map_err(|err| AdminError::from_repository(err, KEYWORD_UPDATE_FAILED))?;

        log::info!("🏷️ Updated keyword {}", id);
        Ok(MutationResponse {
            message: KEYWORD_UPDATED.to_string(),
            id,
        })
    }

    pub fn delete_keyword(&self, path_id: &str) -> AdminResult<MutationResponse> {
        let id = parse_id("id", path_id)?;
        self.delete_entity(Table::Keywords, id, KEYWORD_DELETE_FAILED)?;

        log::info!("🗑️ Deleted keyword {}", id);
        Ok(MutationResponse {
            message: KEYWORD_DELETED.to_string(),
            id,
        })
    }

    pub fn list_associations(&self) -> AdminResult<Vec<Association>> {
        self.repository
            .associations()
            .map_err(|err| AdminError::from_repository(err, RELATIONS_LIST_FAILED))
    }

    /// Attach keyword to link. Both must exist and the pair must be new.
    pub fn create_association(&self, req: &AssociationRequest) -> AdminResult<MutationResponse> {
        let link_id = json_id("link_id", req.link_id.as_ref())?;
        let keyword_id = json_id("keyword_id", req.keyword_id.as_ref())?;

        for (table, column, id) in [
            (Table::Links, Column::LinkId, link_id),
            (Table::Keywords, Column::KeywordId, keyword_id),
        ] {
            let found = self
                .repository
                .exists(table, column, id)
                .map_err(|err| AdminError::from_repository(err, RELATION_CREATE_FAILED))?;
            if !found {
                log::warn!("Cannot relate: {} has no row {}", table, id);
                return Err(AdminError::NotFound(RELATION_CREATE_FAILED.to_string()));
            }
        }

        let fields = Fields::new()
            .with(Column::LinkId, link_id)
            .with(Column::KeywordId, keyword_id);
        let id = match self.repository.insert(Table::LinksKeywords, &fields) {
            Ok(id) => id,
            Err(RepositoryError::Duplicate { .. }) => {
                log::warn!("Link {} already has keyword {}", link_id, keyword_id);
                return Err(AdminError::Conflict(RELATION_EXISTS.to_string()));
            }
            Err(err) => return Err(AdminError::from_repository(err, RELATION_CREATE_FAILED)),
        };

        log::info!("🔗 Related link {} with keyword {}", link_id, keyword_id);
        Ok(MutationResponse {
            message: RELATION_CREATED.to_string(),
            id,
        })
    }

    pub fn delete_association(&self, req: &AssociationRequest) -> AdminResult<AssociationDeleted> {
        let link_id = json_id("link_id", req.link_id.as_ref())?;
        let keyword_id = json_id("keyword_id", req.keyword_id.as_ref())?;

        let key = Fields::new()
            .with(Column::LinkId, link_id)
            .with(Column::KeywordId, keyword_id);
        let deleted = self
            .repository
            .delete(Table::LinksKeywords, &key)
            .map_err(|err| AdminError::from_repository(err, RELATION_DELETE_FAILED))?;
        if !deleted {
            log::warn!("No relation between link {} and keyword {}", link_id, keyword_id);
            return Err(AdminError::NotFound(RELATION_DELETE_FAILED.to_string()));
        }

        log::info!("🗑️ Unrelated link {} from keyword {}", link_id, keyword_id);
        Ok(AssociationDeleted {
            message: RELATION_DELETED.to_string(),
            link_id,
            keyword_id,
        })
    }

    /// Public keyword search. Storage failures read as "no links found".
    pub fn search(&self, req: &SearchRequest) -> AdminResult<SearchResponse> {
        let keyword_text = required_text("keyword_text", req.keyword_text.as_deref())?;
        let mode = SearchMode::from_request(
            req.mode
                .as_deref()
                .map(validate::sanitize_text_field)
                .as_deref(),
        );
        let post_id = optional_json_id("post_id", req.post_id.as_ref())?
            .and_then(|id| u64::try_from(id).ok());

        let outcome = self.resolver.search(&SearchQuery {
            keyword_text,
            post_id,
            mode,
        });
        Ok(match outcome {
            SearchOutcome::Found { links, next_url } => SearchResponse {
                message: LINKS_FOUND.to_string(),
                result: links,
                link: next_url,
            },
            SearchOutcome::NotFound { next_url } => SearchResponse {
                message: NO_LINKS_FOUND.to_string(),
                result: Vec::new(),
                link: next_url,
            },
        })
    }

    fn delete_entity(&self, table: Table, id: i64, failure: &str) -> AdminResult<()> {
        let deleted = self
            .repository
            .delete_cascade(table, id)
            .map_err(|err| AdminError::from_repository(err, failure))?;
        if !deleted {
            log::warn!("{} has no row {} to delete", table, id);
            return Err(AdminError::NotFound(failure.to_string()));
        }
        Ok(())
    }
}

fn ensure_same_id(field: &str, path_id: i64, body_id: Option<i64>) -> AdminResult<()> {
    match body_id {
        Some(body) if body != path_id => Err(AdminError::invalid(field)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tempfile::TempDir;
    use url::Url;

    use super::*;
    use crate::{permalink::SitePermalinks, storage::SqliteStore};

    fn service() -> (TempDir, AdminService<SqliteStore>) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("admin.sqlite"));
        store.init().unwrap();
        let repository = Repository::new(store);
        let permalinks = SitePermalinks::new(Url::parse("https://example.com/").unwrap());
        let resolver = Resolver::new(repository.clone(), Arc::new(permalinks));
        (dir, AdminService::new(repository, resolver))
    }

    fn link_req(url: &str, label: &str) -> LinkRequest {
        LinkRequest {
            link_url: Some(url.to_string()),
            link_label: Some(label.to_string()),
            ..Default::default()
        }
    }

    fn keyword_req(text: &str) -> KeywordRequest {
        KeywordRequest {
            keyword_text: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn pair(link_id: i64, keyword_id: i64) -> AssociationRequest {
        AssociationRequest {
            link_id: Some(json!(link_id)),
            keyword_id: Some(json!(keyword_id)),
        }
    }

    fn search_req(text: &str, post_id: Option<u64>, mode: Option<&str>) -> SearchRequest {
        SearchRequest {
            keyword_text: Some(text.to_string()),
            post_id: post_id.map(|id| json!(id)),
            mode: mode.map(str::to_string),
        }
    }

    #[test]
    fn create_link_sanitizes_input() {
        let (_dir, svc) = service();
        let res = svc
            .create_link(&link_req("  https://x/billing ", "<b>Billing</b>  help"))
            .unwrap();
        assert_eq!(res.message, "Link created successfully.");
        assert_eq!(res.id, 1);

        let links = svc.list_links().unwrap();
        assert_eq!(links[0].url, "https://x/billing");
        assert_eq!(links[0].label, "Billing help");
    }

    #[test]
    fn create_link_requires_both_fields() {
        let (_dir, svc) = service();
        let err = svc
            .create_link(&LinkRequest {
                link_url: Some("https://x".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(
            err,
            AdminError::Validation("Missing parameter(s): link_label".to_string())
        );

        let err = svc.create_link(&link_req("https://x", "  ")).unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
        assert!(svc.list_links().unwrap().is_empty());
    }

    #[test]
    fn update_link_merges_missing_fields() {
        let (_dir, svc) = service();
        let id = svc.create_link(&link_req("https://x/a", "A")).unwrap().id;

        let res = svc
            .update_link(
                &id.to_string(),
                &LinkRequest {
                    link_label: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(res.message, "Link updated successfully.");
        assert_eq!(res.id, id);

        let link = &svc.list_links().unwrap()[0];
        assert_eq!(link.url, "https://x/a");
        assert_eq!(link.label, "Renamed");
    }

    #[test]
    fn update_link_with_identical_values_succeeds() {
        let (_dir, svc) = service();
        let id = svc.create_link(&link_req("https://x/a", "A")).unwrap().id;
        assert!(svc
            .update_link(&id.to_string(), &link_req("https://x/a", "A"))
            .is_ok());
    }

    #[test]
    fn update_link_rejects_mismatched_body_id() {
        let (_dir, svc) = service();
        let id = svc.create_link(&link_req("https://x/a", "A")).unwrap().id;
        let err = svc
            .update_link(
                &id.to_string(),
                &LinkRequest {
                    link_id: Some(json!(id + 1)),
                    ..link_req("https://x/b", "B")
                },
            )
            .unwrap_err();
        assert_eq!(err, AdminError::invalid("link_id"));
    }

    #[test]
    fn update_missing_link_is_not_found() {
        let (_dir, svc) = service();
        let err = svc.update_link("9", &link_req("https://x", "X")).unwrap_err();
        assert_eq!(err, AdminError::NotFound("Failed to update link.".to_string()));
    }

    #[test]
    fn non_numeric_ids_never_reach_storage() {
        let (dir, svc) = service();
        std::fs::remove_file(dir.path().join("admin.sqlite")).unwrap();

        for id in ["abc", "1 OR 1=1", "-4", ""] {
            assert!(matches!(
                svc.delete_link(id),
                Err(AdminError::Validation(_))
            ));
            assert!(matches!(
                svc.update_keyword(id, &keyword_req("x")),
                Err(AdminError::Validation(_))
            ));
        }
        assert!(!dir.path().join("admin.sqlite").exists());
    }

    #[test]
    fn delete_link_cascades_and_reports_id() {
        let (_dir, svc) = service();
        let link = svc.create_link(&link_req("https://x/a", "A")).unwrap().id;
        let keyword = svc.create_keyword(&keyword_req("billing")).unwrap().id;
        svc.create_association(&pair(link, keyword)).unwrap();

        let res = svc.delete_link(&link.to_string()).unwrap();
        assert_eq!(
            res,
            MutationResponse {
                message: "Link deleted successfully.".to_string(),
                id: link
            }
        );
        assert!(svc.list_associations().unwrap().is_empty());
        assert_eq!(svc.list_keywords().unwrap().len(), 1);

        let err = svc.delete_link(&link.to_string()).unwrap_err();
        assert_eq!(err, AdminError::NotFound("Failed to delete link.".to_string()));
    }

    #[test]
    fn keyword_lifecycle() {
        let (_dir, svc) = service();
        let created = svc.create_keyword(&keyword_req(" billing ")).unwrap();
        assert_eq!(created.message, "Keyword created successfully.");

        let updated = svc
            .update_keyword(&created.id.to_string(), &keyword_req("invoices"))
            .unwrap();
        assert_eq!(updated.message, "Keyword updated successfully.");
        assert_eq!(svc.list_keywords().unwrap()[0].text, "invoices");

        let deleted = svc.delete_keyword(&created.id.to_string()).unwrap();
        assert_eq!(deleted.message, "Keyword deleted successfully.");
        assert!(svc.list_keywords().unwrap().is_empty());
    }

    #[test]
    fn association_requires_existing_parents() {
        let (_dir, svc) = service();
        let keyword = svc.create_keyword(&keyword_req("billing")).unwrap().id;
        let err = svc.create_association(&pair(5, keyword)).unwrap_err();
        assert_eq!(
            err,
            AdminError::NotFound("Failed to create link-keyword relationship.".to_string())
        );
    }

    #[test]
    fn duplicate_association_is_a_conflict() {
        let (_dir, svc) = service();
        let link = svc.create_link(&link_req("https://x/a", "A")).unwrap().id;
        let keyword = svc.create_keyword(&keyword_req("billing")).unwrap().id;

        let res = svc.create_association(&pair(link, keyword)).unwrap();
        assert_eq!(res.message, "Link-keyword relationship created successfully.");
        let err = svc.create_association(&pair(link, keyword)).unwrap_err();
        assert!(matches!(err, AdminError::Conflict(_)));
        assert_eq!(svc.list_associations().unwrap().len(), 1);
    }

    #[test]
    fn association_delete_echoes_pair() {
        let (_dir, svc) = service();
        let link = svc.create_link(&link_req("https://x/a", "A")).unwrap().id;
        let keyword = svc.create_keyword(&keyword_req("billing")).unwrap().id;
        svc.create_association(&pair(link, keyword)).unwrap();

        let res = svc
            .delete_association(&AssociationRequest {
                link_id: Some(json!(link.to_string())),
                keyword_id: Some(json!(keyword)),
            })
            .unwrap();
        assert_eq!(
            res,
            AssociationDeleted {
                message: "Link keyword relation deleted successfully.".to_string(),
                link_id: link,
                keyword_id: keyword,
            }
        );

        let err = svc.delete_association(&pair(link, keyword)).unwrap_err();
        assert!(matches!(err, AdminError::NotFound(_)));
    }

    #[test]
    fn association_ids_must_be_numeric() {
        let (_dir, svc) = service();
        let err = svc
            .create_association(&AssociationRequest {
                link_id: Some(json!("one")),
                keyword_id: Some(json!(1)),
            })
            .unwrap_err();
        assert_eq!(err, AdminError::invalid("link_id"));

        let err = svc
            .delete_association(&AssociationRequest {
                link_id: Some(json!(1)),
                keyword_id: None,
            })
            .unwrap_err();
        assert_eq!(err, AdminError::missing("keyword_id"));
    }

    #[test]
    fn search_found_and_not_found_shapes() {
        let (_dir, svc) = service();
        let link = svc
            .create_link(&link_req("https://x/billing", "Billing help"))
            .unwrap()
            .id;
        let keyword = svc.create_keyword(&keyword_req("billing")).unwrap().id;
        svc.create_association(&pair(link, keyword)).unwrap();

        let found = svc.search(&search_req("billing", Some(42), None)).unwrap();
        assert_eq!(found.message, "Links found successfully.");
        assert_eq!(found.result.len(), 1);
        assert_eq!(found.result[0].label, "Billing help");
        assert_eq!(
            found.link,
            "https://example.com/?p=42&lmh_receptionist=checked"
        );

        let missing = svc.search(&search_req("refunds", Some(42), None)).unwrap();
        assert_eq!(
            missing,
            SearchResponse {
                message: "No links found.".to_string(),
                result: Vec::new(),
                link: "https://example.com/?p=42&lmh_receptionist=checked".to_string(),
            }
        );

        let editor = svc
            .search(&search_req("billing", Some(42), Some("editor")))
            .unwrap();
        assert_eq!(editor.link, "");
        assert_eq!(editor.result.len(), 1);
    }

    #[test]
    fn search_requires_keyword_text() {
        let (_dir, svc) = service();
        let err = svc.search(&SearchRequest::default()).unwrap_err();
        assert_eq!(err, AdminError::missing("keyword_text"));
    }
}
