use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::types::Link;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LinkRequest {
    #[serde(default)]
    pub link_id: Option<Json>,
    #[serde(default, alias = "url")]
    pub link_url: Option<String>,
    #[serde(default, alias = "label")]
    pub link_label: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct KeywordRequest {
    #[serde(default)]
    pub keyword_id: Option<Json>,
    #[serde(default)]
    pub keyword_text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AssociationRequest {
    #[serde(default)]
    pub link_id: Option<Json>,
    #[serde(default)]
    pub keyword_id: Option<Json>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub keyword_text: Option<String>,
    #[serde(default)]
    pub post_id: Option<Json>,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationDeleted {
    pub message: String,
    pub link_id: i64,
    pub keyword_id: i64,
}

/// `link` is the forward URL, empty in editor mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub message: String,
    pub result: Vec<Link>,
    pub link: String,
}
