use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

use super::admin::admin_router;
use super::browse::browse_router;
use super::sessions::session_router;
use crate::config::ServerConfig;
use crate::payload::CompressionPolicy;
use crate::session::SessionRegistry;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionRegistry,
    pub compression: CompressionPolicy,
    /// Body limit applied to the multipart upload routes.
    pub max_upload_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: &ServerConfig) -> Self {
        Self {
            store,
            sessions: SessionRegistry::new(),
            compression: config.compression_policy(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/admin", admin_router(state.max_upload_bytes))
        .nest("/api/v1", session_router())
        .nest("/api/v1", browse_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
