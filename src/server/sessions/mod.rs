mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::server::AppState;

pub fn session_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}/page", put(handlers::navigate))
        .route("/sessions/{id}/login", post(handlers::login))
        .route("/sessions/{id}/logout", post(handlers::logout))
}
