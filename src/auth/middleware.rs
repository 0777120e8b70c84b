use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::server::AppState;
use crate::session::Session;

pub const SESSION_HEADER: &str = "x-session-id";

/// Extractor that requires a known session, logged in or not
pub struct RequireSession {
    pub id: String,
    pub session: Session,
}

/// Extractor that requires a session whose admin flag is set
pub struct RequireAdmin {
    pub id: String,
}

#[derive(Debug)]
pub enum AuthError {
    MissingSession,
    UnknownSession,
    NotLoggedIn,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingSession => (StatusCode::UNAUTHORIZED, "Session id required"),
            AuthError::UnknownSession => (StatusCode::UNAUTHORIZED, "Unknown session"),
            AuthError::NotLoggedIn => (StatusCode::FORBIDDEN, "Admin login required"),
        };

        let body = json!({ "data": null, "error": message });
        (status, Json(body)).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for RequireSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(AuthError::MissingSession)?
            .to_string();

        let session = state.sessions.get(&id).ok_or(AuthError::UnknownSession)?;
        Ok(RequireSession { id, session })
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let RequireSession { id, session } = RequireSession::from_request_parts(parts, state).await?;

        if !session.logged_in {
            return Err(AuthError::NotLoggedIn);
        }

        Ok(RequireAdmin { id })
    }
}
