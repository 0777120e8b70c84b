use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;

use crate::portal::{AnnouncementQuery, resolver};
use crate::server::AppState;
use crate::server::dto::{AnnouncementResponse, ListingResponse};
use crate::server::response::{ApiError, ApiResponse};

pub async fn list_aptitude_tests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnnouncementQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tests = resolver::list_aptitude_tests(state.store.as_ref(), &query, Utc::now())?;
    let listing = ListingResponse::from(tests.map(AnnouncementResponse::from));
    Ok(Json(ApiResponse::success(listing)))
}

pub async fn list_weekly_quizzes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnnouncementQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let quizzes = resolver::list_weekly_quizzes(state.store.as_ref(), &query, Utc::now())?;
    let listing = ListingResponse::from(quizzes.map(AnnouncementResponse::from));
    Ok(Json(ApiResponse::success(listing)))
}
