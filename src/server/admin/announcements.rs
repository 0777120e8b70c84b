use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireAdmin;
use crate::error::Error;
use crate::portal::{AnnouncementDraft, admin};
use crate::server::AppState;
use crate::server::dto::{AptitudeTestRequest, CreatedResponse, WeeklyQuizRequest};
use crate::server::response::{ApiError, ApiResponse};
use crate::types::{AnnouncementKind, Cohort};

fn publish(
    state: &AppState,
    draft: &AnnouncementDraft,
) -> Result<(StatusCode, Json<ApiResponse<CreatedResponse>>), ApiError> {
    let id = admin::publish_announcement(state.store.as_ref(), draft, Utc::now())?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedResponse { id })),
    ))
}

pub async fn publish_aptitude_test(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<AptitudeTestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = AnnouncementDraft {
        cohort: Cohort::AptitudeTest { year: req.year },
        title: req.title,
        description: req.description,
        topics: req.topics,
        duration: req.duration,
        total_questions: req.total_questions,
        form_link: req.form_link,
        expiry_hours: req.expiry_hours,
    };
    publish(&state, &draft)
}

pub async fn publish_weekly_quiz(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<WeeklyQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = AnnouncementDraft {
        cohort: Cohort::WeeklyQuiz {
            year: req.year,
            semester: req.semester,
            branch: req.branch,
        },
        title: req.title,
        description: req.description,
        topics: req.topics,
        duration: req.duration,
        total_questions: req.total_questions,
        form_link: req.form_link,
        expiry_hours: None,
    };
    publish(&state, &draft)
}

pub async fn delete_announcement(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let kind: AnnouncementKind = kind.parse().map_err(ApiError::not_found)?;
    admin::delete_announcement(state.store.as_ref(), kind, id).map_err(|e| match e {
        Error::NotFound => ApiError::not_found("Announcement not found"),
        e => ApiError::from(e),
    })?;

    Ok(StatusCode::NO_CONTENT)
}
