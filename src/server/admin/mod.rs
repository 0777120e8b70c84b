mod announcements;
mod dashboard;
mod documents;
mod uploads;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

use crate::server::AppState;

pub fn admin_router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    let upload_limit = DefaultBodyLimit::max(max_upload_bytes);

    Router::new()
        // Uploads
        .route("/papers", post(uploads::upload_papers).layer(upload_limit))
        .route("/notes", post(uploads::upload_notes).layer(upload_limit))
        .route(
            "/assignments",
            post(uploads::upload_assignments).layer(upload_limit),
        )
        // Document maintenance
        .route("/documents/{kind}", get(documents::search_documents))
        .route("/documents/{kind}/{id}", delete(documents::delete_document))
        // Announcements
        .route(
            "/aptitude-tests",
            post(announcements::publish_aptitude_test),
        )
        .route(
            "/weekly-quizzes",
            post(announcements::publish_weekly_quiz),
        )
        .route(
            "/announcements/{kind}/{id}",
            delete(announcements::delete_announcement),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
}
