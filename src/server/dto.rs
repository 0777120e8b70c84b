use serde::{Deserialize, Serialize};

use crate::portal::{INCOMPLETE_PROMPT, Resolution, UploadSummary};
use crate::session::{Page, Session, View};
use crate::types::catalog;
use crate::types::{Announcement, Document, DocumentKind};

/// A filtered listing. `complete` is false when selectors are missing, in
/// which case `items` is empty and `prompt` says why.
#[derive(Debug, Serialize)]
pub struct ListingResponse<T: Serialize> {
    pub complete: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'static str>,
    pub items: Vec<T>,
}

impl<T: Serialize> From<Resolution<T>> for ListingResponse<T> {
    fn from(resolution: Resolution<T>) -> Self {
        match resolution {
            Resolution::Incomplete { missing } => Self {
                complete: false,
                missing,
                prompt: Some(INCOMPLETE_PROMPT),
                items: Vec::new(),
            },
            Resolution::Resolved(items) => Self {
                complete: true,
                missing: Vec::new(),
                prompt: None,
                items,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    #[serde(flatten)]
    pub document: Document,
    pub download_url: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        let download_url = format!(
            "/api/v1/{}/{}/download",
            document.category.kind(),
            document.id
        );
        Self {
            document,
            download_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnnouncementResponse {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub topic_list: Vec<String>,
}

impl From<Announcement> for AnnouncementResponse {
    fn from(announcement: Announcement) -> Self {
        let topic_list = announcement.topic_list();
        Self {
            announcement,
            topic_list,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub unset: &'static str,
    pub branches: &'static [&'static str],
    pub regulations: &'static [&'static str],
    pub years: &'static [&'static str],
    pub semesters: &'static [&'static str],
    pub paper_types: &'static [&'static str],
    pub units: &'static [&'static str],
    pub pages: Vec<&'static str>,
}

impl CatalogResponse {
    #[must_use]
    pub fn current() -> Self {
        Self {
            unset: catalog::UNSET,
            branches: catalog::BRANCHES,
            regulations: catalog::REGULATIONS,
            years: catalog::YEARS,
            semesters: catalog::SEMESTERS,
            paper_types: catalog::PAPER_TYPES,
            units: catalog::UNITS,
            pages: Page::ALL.iter().map(|page| page.name()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub page: Page,
    pub logged_in: bool,
    pub view: View,
}

impl SessionResponse {
    #[must_use]
    pub fn new(id: String, session: Session) -> Self {
        Self {
            id,
            page: session.page,
            logged_in: session.logged_in,
            view: session.view(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub page: Page,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AptitudeTestRequest {
    pub year: String,
    pub title: String,
    pub description: String,
    pub topics: String,
    pub duration: String,
    pub total_questions: i64,
    pub form_link: String,
    #[serde(default)]
    pub expiry_hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyQuizRequest {
    pub year: String,
    pub semester: String,
    pub branch: String,
    pub title: String,
    pub description: String,
    pub topics: String,
    pub duration: String,
    pub total_questions: i64,
    pub form_link: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub kind: DocumentKind,
    #[serde(flatten)]
    pub summary: UploadSummary,
}
