use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::error::Error;
use crate::portal::admin;
use crate::server::AppState;
use crate::server::dto::{DeleteParams, SearchParams};
use crate::server::response::{ApiError, ApiResponse};
use crate::types::DocumentKind;

fn parse_kind(kind: &str) -> Result<DocumentKind, ApiError> {
    kind.parse().map_err(ApiError::not_found)
}

pub async fn search_documents(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(&kind)?;
    let summaries = admin::search_documents(state.store.as_ref(), kind, &params.search)?;
    Ok(Json(ApiResponse::success(summaries)))
}

pub async fn delete_document(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
    Query(params): Query<DeleteParams>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(&kind)?;
    admin::delete_document(state.store.as_ref(), kind, id, params.confirm).map_err(|e| match e {
        Error::NotFound => ApiError::not_found("Document not found"),
        e => ApiError::from(e),
    })?;

    Ok(StatusCode::NO_CONTENT)
}
