use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireAdmin;
use crate::portal;
use crate::server::AppState;
use crate::server::dto::DashboardParams;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

pub async fn get_dashboard(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = portal::dashboard_stats(state.store.as_ref(), params.year, Utc::now())
        .api_err("Failed to load dashboard")?;
    Ok(Json(ApiResponse::success(stats)))
}
