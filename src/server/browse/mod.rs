mod announcements;
mod documents;

use std::sync::Arc;

use axum::{Json, Router, response::IntoResponse, routing::get};

use crate::server::AppState;
use crate::server::dto::CatalogResponse;
use crate::server::response::ApiResponse;

async fn catalog() -> impl IntoResponse {
    Json(ApiResponse::success(CatalogResponse::current()))
}

pub fn browse_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog", get(catalog))
        // Document listings
        .route("/papers", get(documents::list_papers))
        .route("/notes", get(documents::list_notes))
        .route("/assignments", get(documents::list_assignments))
        .route("/{kind}/{id}/download", get(documents::download))
        // Announcements
        .route("/aptitude-tests", get(announcements::list_aptitude_tests))
        .route("/weekly-quizzes", get(announcements::list_weekly_quizzes))
}
