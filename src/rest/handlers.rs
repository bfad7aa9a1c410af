use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    admin::{
        models::{AssociationRequest, KeywordRequest, LinkRequest, SearchRequest},
        AdminError, AdminResult,
    },
    storage::Store,
};

use super::{
    models::{AssociationQuery, ErrorResponse, HealthResponse},
    AppState,
};

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match &self {
            AdminError::Validation(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Conflict(_) => StatusCode::CONFLICT,
            AdminError::Unauthorized => StatusCode::UNAUTHORIZED,
            AdminError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

fn respond<T: Serialize>(status: StatusCode, result: AdminResult<T>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// An empty body reads as a request with every field absent.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> AdminResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        log::warn!("Rejected request body: {}", err);
        AdminError::Validation("Invalid JSON body.".to_string())
    })
}

pub async fn health<S: Store>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            uptime_secs,
        }),
    )
}

pub async fn list_links<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| state.admin.list_links());
    respond(StatusCode::OK, result)
}

pub async fn create_link<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| parse_body::<LinkRequest>(&body))
        .and_then(|req| state.admin.create_link(&req));
    respond(StatusCode::CREATED, result)
}

pub async fn update_link<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| parse_body::<LinkRequest>(&body))
        .and_then(|req| state.admin.update_link(&id, &req));
    respond(StatusCode::OK, result)
}

pub async fn delete_link<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| state.admin.delete_link(&id));
    respond(StatusCode::OK, result)
}

pub async fn list_keywords<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| state.admin.list_keywords());
    respond(StatusCode::OK, result)
}

pub async fn create_keyword<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| parse_body::<KeywordRequest>(&body))
        .and_then(|req| state.admin.create_keyword(&req));
    respond(StatusCode::CREATED, result)
}

pub async fn update_keyword<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| parse_body::<KeywordRequest>(&body))
        .and_then(|req| state.admin.update_keyword(&id, &req));
    respond(StatusCode::OK, result)
}

pub async fn delete_keyword<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| state.admin.delete_keyword(&id));
    respond(StatusCode::OK, result)
}

pub async fn list_associations<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| state.admin.list_associations());
    respond(StatusCode::OK, result)
}

pub async fn create_association<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| parse_body::<AssociationRequest>(&body))
        .and_then(|req| state.admin.create_association(&req));
    respond(StatusCode::CREATED, result)
}

/// The pair may come in the JSON body or, when the body is empty, the query string.
pub async fn delete_association<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    query: Result<Query<AssociationQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    let result = state
        .authorize(&headers)
        .and_then(|_| {
            query.map(|Query(query)| query).map_err(|err| {
                log::warn!("Rejected query string: {}", err);
                AdminError::Validation("Invalid query string.".to_string())
            })
        })
        .and_then(|query| {
            parse_body::<AssociationRequest>(&body).map(|req| AssociationRequest {
                link_id: req.link_id.or(query.link_id.map(serde_json::Value::String)),
                keyword_id: req
                    .keyword_id
                    .or(query.keyword_id.map(serde_json::Value::String)),
            })
        })
        .and_then(|req| state.admin.delete_association(&req));
    respond(StatusCode::OK, result)
}

/// Public: no capability check.
pub async fn search_links<S: Store>(State(state): State<AppState<S>>, body: Bytes) -> Response {
    let result = parse_body::<SearchRequest>(&body).and_then(|req| state.admin.search(&req));
    respond(StatusCode::OK, result)
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}
