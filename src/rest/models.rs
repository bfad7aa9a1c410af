use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Query-string form of an association key, as sent by `DELETE /links-keywords/?link_id=..`.
#[derive(Deserialize)]
pub struct AssociationQuery {
    pub link_id: Option<String>,
    pub keyword_id: Option<String>,
}
