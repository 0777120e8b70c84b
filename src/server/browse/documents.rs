use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::error::Error;
use crate::portal::{self, AssignmentQuery, NoteQuery, PaperQuery, resolver};
use crate::server::AppState;
use crate::server::dto::{DocumentResponse, DownloadParams, ListingResponse};
use crate::server::response::{ApiError, ApiResponse};
use crate::types::DocumentKind;

pub async fn list_papers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PaperQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // The question papers page doubles as the announcement sweep trigger.
    portal::sweep_expired(state.store.as_ref(), Utc::now());

    let papers = resolver::resolve_papers(state.store.as_ref(), &query)?;
    let listing = ListingResponse::from(papers.map(DocumentResponse::from));
    Ok(Json(ApiResponse::success(listing)))
}

pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = resolver::resolve_notes(state.store.as_ref(), &query)?;
    let listing = ListingResponse::from(notes.map(DocumentResponse::from));
    Ok(Json(ApiResponse::success(listing)))
}

pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AssignmentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let assignments = resolver::resolve_assignments(state.store.as_ref(), &query)?;
    let listing = ListingResponse::from(assignments.map(DocumentResponse::from));
    Ok(Json(ApiResponse::success(listing)))
}

fn content_disposition(inline: bool, filename: &str) -> HeaderValue {
    let disposition = if inline { "inline" } else { "attachment" };
    let ascii: String = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
        .collect();
    let ascii = if ascii.trim().is_empty() {
        "document.pdf".to_string()
    } else {
        ascii
    };

    let value = format!(
        "{disposition}; filename=\"{ascii}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let kind: DocumentKind = kind.parse().map_err(ApiError::not_found)?;

    let asset = portal::load_asset(state.store.as_ref(), kind, id).map_err(|e| match e {
        Error::NotFound => ApiError::not_found("Document not found"),
        e => ApiError::from(e),
    })?;

    portal::record_download(state.store.as_ref(), kind, id, Utc::now());

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        content_disposition(params.inline, &asset.document.filename),
    );
    if let Ok(etag) = HeaderValue::from_str(&format!("\"{}\"", asset.document.checksum)) {
        headers.insert(header::ETAG, etag);
    }

    Ok((StatusCode::OK, headers, asset.bytes).into_response())
}
