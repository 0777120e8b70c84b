use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireAdmin;
use crate::portal::{UploadBatch, UploadFile, admin};
use crate::server::AppState;
use crate::server::dto::UploadResponse;
use crate::server::response::{ApiError, ApiResponse};
use crate::types::{Category, DocumentKind};

#[derive(Debug, Default)]
struct UploadForm {
    files: Vec<UploadFile>,
    branches: Vec<String>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    fn field(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    fn category(&self, kind: DocumentKind) -> Category {
        match kind {
            DocumentKind::ExamPaper => Category::ExamPaper {
                regulation: self.field("regulation"),
                year: self.field("year"),
                semester: self.field("semester"),
                paper_type: self.field("paper_type"),
            },
            DocumentKind::SubjectNote => Category::SubjectNote {
                subject: self.field("subject"),
                regulation: self.field("regulation"),
                year: self.field("year"),
            },
            DocumentKind::Assignment => Category::Assignment {
                branch: self.field("branch"),
                year: self.field("year"),
                semester: self.field("semester"),
                subject: self.field("subject"),
                unit: self.field("unit"),
            },
        }
    }

    fn into_batch(self, kind: DocumentKind) -> UploadBatch {
        let category = self.category(kind);
        let branches = if kind == DocumentKind::ExamPaper {
            self.branches
        } else {
            Vec::new()
        };
        UploadBatch {
            category,
            branches,
            files: self.files,
        }
    }
}

fn multipart_error(e: &MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(format!("Upload too large: {}", e.body_text()))
    } else {
        ApiError::bad_request(format!("Failed to read multipart: {}", e.body_text()))
    }
}

/// Collects `file` parts, repeated `branch` parts (exam papers) and plain
/// selector fields.
async fn read_upload_form(
    kind: DocumentKind,
    multipart: &mut Multipart,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "files" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| multipart_error(&e))?;
                form.files.push(UploadFile {
                    filename,
                    bytes: data,
                });
            }
            "branch" if kind == DocumentKind::ExamPaper => {
                let branch = field.text().await.map_err(|e| multipart_error(&e))?;
                form.branches.push(branch);
            }
            _ => {
                let value = field.text().await.map_err(|e| multipart_error(&e))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

async fn upload(
    state: &AppState,
    kind: DocumentKind,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let batch = read_upload_form(kind, &mut multipart).await?.into_batch(kind);
    let summary = admin::upload_batch(state.store.as_ref(), &batch, &state.compression, Utc::now())?;

    Ok(Json(ApiResponse::success(UploadResponse { kind, summary })))
}

pub async fn upload_papers(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> impl IntoResponse {
    upload(&state, DocumentKind::ExamPaper, multipart).await
}

pub async fn upload_notes(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> impl IntoResponse {
    upload(&state, DocumentKind::SubjectNote, multipart).await
}

pub async fn upload_assignments(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> impl IntoResponse {
    upload(&state, DocumentKind::Assignment, multipart).await
}
