use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::verify_admin_login;
use crate::portal;
use crate::server::AppState;
use crate::server::dto::{LoginRequest, NavigateRequest, SessionResponse};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};

pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (id, session) = state.sessions.create();
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(SessionResponse::new(id, session))),
    )
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.sessions.get(&id).or_not_found("Session not found")?;
    Ok(Json(ApiResponse::success(SessionResponse::new(id, session))))
}

pub async fn navigate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NavigateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sessions
        .navigate(&id, req.page)
        .or_not_found("Session not found")?;

    if req.page.sweeps_announcements() {
        portal::sweep_expired(state.store.as_ref(), Utc::now());
    }

    Ok(Json(ApiResponse::success(SessionResponse::new(id, session))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.sessions.get(&id).or_not_found("Session not found")?;

    let valid = verify_admin_login(state.store.as_ref(), req.username.trim(), &req.password)
        .api_err("Failed to verify credentials")?;
    if !valid {
        tracing::warn!(session = %id, "Rejected admin login");
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let session = state
        .sessions
        .set_logged_in(&id, true)
        .or_not_found("Session not found")?;
    tracing::info!(session = %id, "Admin logged in");

    Ok(Json(ApiResponse::success(SessionResponse::new(id, session))))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sessions
        .set_logged_in(&id, false)
        .or_not_found("Session not found")?;
    tracing::info!(session = %id, "Admin logged out");

    Ok(Json(ApiResponse::success(SessionResponse::new(id, session))))
}
