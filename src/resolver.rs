//! Keyword search: keyword text -> keyword row -> associated link ids -> links.

use std::sync::Arc;

use crate::{
    permalink::{next_step_url, PermalinkResolver},
    repository::{Repository, RepositoryResult},
    storage::{Column, Store, Table, Value},
    types::{Link, Record},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// A site visitor; responses carry a forward URL.
    #[default]
    Visitor,
    /// Block editor preview; no forward URL is produced.
    Editor,
}

impl SearchMode {
    pub fn from_request(mode: Option<&str>) -> Self {
        match mode {
            Some("editor") => SearchMode::Editor,
            _ => SearchMode::Visitor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword_text: String,
    pub post_id: Option<u64>,
    pub mode: SearchMode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { links: Vec<Link>, next_url: String },
    NotFound { next_url: String },
}

#[cfg(test)]
impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn links(&self) -> &[Link] {
        match self {
            SearchOutcome::Found { links, .. } => links,
            SearchOutcome::NotFound { .. } => &[],
        }
    }

    pub fn next_url(&self) -> &str {
        match self {
            SearchOutcome::Found { next_url, .. } | SearchOutcome::NotFound { next_url } => {
                next_url
            }
        }
    }
}

#[derive(Clone)]
pub struct Resolver<S: Store> {
    repository: Repository<S>,
    permalinks: Arc<dyn PermalinkResolver>,
}

impl<S: Store> Resolver<S> {
    pub fn new(repository: Repository<S>, permalinks: Arc<dyn PermalinkResolver>) -> Self {
        Self {
            repository,
            permalinks,
        }
    }

    /// Resolve `query`. Storage failures are logged and reported as no match.
    pub fn search(&self, query: &SearchQuery) -> SearchOutcome {
        let next_url = self.next_url(query.mode, query.post_id);

        match self.resolve(&query.keyword_text) {
            Ok(links) if !links.is_empty() => SearchOutcome::Found { links, next_url },
            Ok(_) => SearchOutcome::NotFound { next_url },
            Err(err) => {
                log::error!("Search for {:?} failed: {}", query.keyword_text, err);
                SearchOutcome::NotFound { next_url }
            }
        }
    }

    /// Links attached to the first keyword row whose text equals `keyword_text`.
    ///
    /// When several keyword rows share the same text only the lowest id is
    /// consulted; associations of the others are not merged in.
    pub fn resolve(&self, keyword_text: &str) -> RepositoryResult<Vec<Link>> {
        let keywords = self.repository.find_by_value(
            Table::Keywords,
            Column::KeywordText,
            &Value::from(keyword_text),
        )?;
        let Some(keyword) = keywords.into_iter().find_map(Record::into_keyword) else {
            return Ok(Vec::new());
        };

        let link_ids = self.repository.find_values_by_key(
            Table::LinksKeywords,
            Column::KeywordId,
            &Value::Integer(keyword.id),
            Column::LinkId,
        )?;
        if link_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .repository
            .find_where_in(Table::Links, Column::LinkId, &link_ids)?
            .into_iter()
            .filter_map(Record::into_link)
            .collect())
    }

    /// Forward URL for visitors; empty in editor mode.
    pub fn next_url(&self, mode: SearchMode, post_id: Option<u64>) -> String {
        match mode {
            SearchMode::Editor => String::new(),
            SearchMode::Visitor => next_step_url(self.permalinks.as_ref(), post_id),
        }
    }
}
