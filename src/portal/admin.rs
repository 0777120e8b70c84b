use std::collections::BTreeSet;

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::payload::{self, CompressionPolicy};
use crate::store::{Predicate, Store};
use crate::types::catalog::{self, BRANCHES, PAPER_TYPES, REGULATIONS, SEMESTERS, UNITS, YEARS};
use crate::types::{
    AnnouncementKind, BranchLink, Category, Cohort, DocumentKind, DocumentSummary, NewAnnouncement,
    NewDocument, Table,
};

use super::validation::{
    validate_choice, validate_filename, validate_form_link, validate_pdf, validate_required,
    validate_subject,
};

pub const DEFAULT_APTITUDE_EXPIRY_HOURS: i64 = 24;
pub const MAX_APTITUDE_EXPIRY_HOURS: i64 = 24 * 366;
pub const WEEKLY_QUIZ_EXPIRY_DAYS: i64 = 7;

/// Reports whether any row of `table` matches every attribute.
pub fn is_duplicate<I, V>(store: &dyn Store, table: Table, attributes: I) -> Result<bool>
where
    I: IntoIterator<Item = (&'static str, V)>,
    V: Into<String>,
{
    store.exists(table, &Predicate::from_attributes(attributes))
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Files sharing one set of category selectors.
#[derive(Debug, Clone)]
pub struct UploadBatch {
    pub category: Category,
    /// Branches tagged on every exam paper in the batch. Ignored for other kinds.
    pub branches: Vec<String>,
    pub files: Vec<UploadFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Uploaded,
    Duplicate,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub filename: String,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub compressed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub items: Vec<UploadOutcome>,
}

impl UploadSummary {
    fn push(&mut self, outcome: UploadOutcome) {
        match outcome.status {
            UploadStatus::Uploaded => self.uploaded += 1,
            UploadStatus::Duplicate => self.duplicates += 1,
            UploadStatus::Failed => self.failed += 1,
        }
        self.items.push(outcome);
    }
}

fn canonical(value: &str, options: &[&str]) -> String {
    let value = value.trim();
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(value))
        .map_or_else(|| value.to_string(), |option| (*option).to_string())
}

/// Checks every selector of a batch before the store is touched.
pub fn validate_batch(batch: &UploadBatch) -> Result<()> {
    if batch.files.is_empty() {
        return Err(Error::BadRequest("Select at least one file".to_string()));
    }

    let checked = match &batch.category {
        Category::ExamPaper {
            regulation,
            year,
            semester,
            paper_type,
        } => validate_choice(regulation, "regulation", REGULATIONS)
            .and_then(|()| validate_choice(year, "year", YEARS))
            .and_then(|()| validate_choice(semester, "semester", SEMESTERS))
            .and_then(|()| validate_choice(paper_type, "paper type", PAPER_TYPES))
            .and_then(|()| {
                if batch.branches.is_empty() {
                    return Err("Select at least one branch".to_string());
                }
                batch
                    .branches
                    .iter()
                    .try_for_each(|branch| validate_choice(branch, "branch", BRANCHES))
            }),
        Category::SubjectNote {
            subject,
            regulation,
            year,
        } => validate_subject(subject)
            .and_then(|()| validate_choice(regulation, "regulation", REGULATIONS))
            .and_then(|()| validate_choice(year, "year", YEARS)),
        Category::Assignment {
            branch,
            year,
            semester,
            subject,
            unit,
        } => validate_choice(branch, "branch", BRANCHES)
            .and_then(|()| validate_choice(year, "year", YEARS))
            .and_then(|()| validate_choice(semester, "semester", SEMESTERS))
            .and_then(|()| validate_subject(subject))
            .and_then(|()| validate_choice(unit, "unit", UNITS)),
    };

    checked.map_err(Error::BadRequest)
}

/// Rewrites selectors into their stored form: catalog spelling, lower-cased
/// paper type, title-cased subject.
#[must_use]
pub fn normalize_category(category: &Category) -> Category {
    match category {
        Category::ExamPaper {
            regulation,
            year,
            semester,
            paper_type,
        } => Category::ExamPaper {
            regulation: canonical(regulation, REGULATIONS),
            year: canonical(year, YEARS),
            semester: canonical(semester, SEMESTERS),
            paper_type: catalog::normalize_paper_type(paper_type),
        },
        Category::SubjectNote {
            subject,
            regulation,
            year,
        } => Category::SubjectNote {
            subject: catalog::title_case(subject),
            regulation: canonical(regulation, REGULATIONS),
            year: canonical(year, YEARS),
        },
        Category::Assignment {
            branch,
            year,
            semester,
            subject,
            unit,
        } => Category::Assignment {
            branch: canonical(branch, BRANCHES),
            year: canonical(year, YEARS),
            semester: canonical(semester, SEMESTERS),
            subject: catalog::title_case(subject),
            unit: canonical(unit, UNITS),
        },
    }
}

/// Stores every file of a batch, skipping duplicates. A failing file is
/// reported and the rest of the batch carries on; nothing is rolled back.
pub fn upload_batch(
    store: &dyn Store,
    batch: &UploadBatch,
    policy: &CompressionPolicy,
    now: DateTime<Utc>,
) -> Result<UploadSummary> {
    validate_batch(batch)?;

    let category = normalize_category(&batch.category);
    let kind = category.kind();
    let branches: BTreeSet<String> = if kind == DocumentKind::ExamPaper {
        batch
            .branches
            .iter()
            .map(|branch| canonical(branch, BRANCHES))
            .collect()
    } else {
        BTreeSet::new()
    };

    let mut summary = UploadSummary::default();
    for file in &batch.files {
        let filename = file.filename.trim().to_string();
        let outcome = match upload_one(store, &category, &branches, &filename, &file.bytes, policy, now)
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(kind = %kind, filename = %filename, "Upload failed: {e}");
                UploadOutcome {
                    filename,
                    status: UploadStatus::Failed,
                    id: None,
                    compressed: false,
                    error: Some(e.to_string()),
                }
            }
        };
        summary.push(outcome);
    }

    tracing::info!(
        kind = %kind,
        uploaded = summary.uploaded,
        duplicates = summary.duplicates,
        failed = summary.failed,
        "Upload batch processed"
    );
    Ok(summary)
}

fn upload_one(
    store: &dyn Store,
    category: &Category,
    branches: &BTreeSet<String>,
    filename: &str,
    bytes: &[u8],
    policy: &CompressionPolicy,
    now: DateTime<Utc>,
) -> Result<UploadOutcome> {
    validate_filename(filename)
        .and_then(|()| validate_pdf(filename, bytes))
        .map_err(Error::BadRequest)?;

    let kind = category.kind();
    let key = std::iter::once(("filename", filename.to_string())).chain(category.attributes());
    if is_duplicate(store, kind.table(), key)? {
        return Ok(UploadOutcome {
            filename: filename.to_string(),
            status: UploadStatus::Duplicate,
            id: None,
            compressed: false,
            error: None,
        });
    }

    let encoded = payload::prepare(bytes, policy)?;
    let id = store.insert_document(&NewDocument {
        filename: filename.to_string(),
        category: category.clone(),
        payload: encoded.text,
        compressed: encoded.compressed,
        size_bytes: encoded.size_bytes,
        checksum: encoded.checksum,
        uploaded_at: now,
    })?;

    if let Err(e) = link_branches(store, id, branches) {
        // An unlinked paper is never listed but would still block a retry as a duplicate.
        if let Err(cleanup) = store.delete_document(kind, id) {
            tracing::warn!(kind = %kind, id, "Failed to remove unlinked paper: {cleanup}");
        }
        return Err(e);
    }

    Ok(UploadOutcome {
        filename: filename.to_string(),
        status: UploadStatus::Uploaded,
        id: Some(id),
        compressed: encoded.compressed,
        error: None,
    })
}

fn link_branches(store: &dyn Store, paper_id: i64, branches: &BTreeSet<String>) -> Result<()> {
    for branch in branches {
        store.add_branch_link(&BranchLink {
            paper_id,
            branch: branch.clone(),
        })?;
    }
    Ok(())
}

/// Removes a document only when the caller has explicitly confirmed.
pub fn delete_document(store: &dyn Store, kind: DocumentKind, id: i64, confirmed: bool) -> Result<()> {
    if !confirmed {
        return Err(Error::ConfirmationRequired);
    }
    if !store.delete_document(kind, id)? {
        return Err(Error::NotFound);
    }
    tracing::info!(kind = %kind, id, "Deleted document");
    Ok(())
}

/// Lists `{id, filename}` whose filename contains `search`, ignoring case.
/// An empty search lists nothing.
pub fn search_documents(
    store: &dyn Store,
    kind: DocumentKind,
    search: &str,
) -> Result<Vec<DocumentSummary>> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let mut summaries = store.list_document_summaries(kind)?;
    summaries.retain(|summary| summary.filename.to_lowercase().contains(&needle));
    Ok(summaries)
}

/// An announcement as entered by the admin, before expiry is computed.
#[derive(Debug, Clone)]
pub struct AnnouncementDraft {
    pub cohort: Cohort,
    pub title: String,
    pub description: String,
    pub topics: String,
    pub duration: String,
    pub total_questions: i64,
    pub form_link: String,
    /// Aptitude tests only; weekly quizzes always last a week.
    pub expiry_hours: Option<i64>,
}

impl AnnouncementDraft {
    /// When an announcement published at `now` stops being listed.
    fn expire_at(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let lifetime = match self.cohort.kind() {
            AnnouncementKind::AptitudeTest => {
                let hours = self.expiry_hours.unwrap_or(DEFAULT_APTITUDE_EXPIRY_HOURS);
                if !(1..=MAX_APTITUDE_EXPIRY_HOURS).contains(&hours) {
                    return Err(Error::BadRequest(format!(
                        "Expiry must be between 1 and {MAX_APTITUDE_EXPIRY_HOURS} hours"
                    )));
                }
                Duration::try_hours(hours)
            }
            AnnouncementKind::WeeklyQuiz => Duration::try_days(WEEKLY_QUIZ_EXPIRY_DAYS),
        };

        lifetime
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| Error::BadRequest("Expiry is out of range".to_string()))
    }

    fn validate(&self) -> Result<()> {
        let cohort = match &self.cohort {
            Cohort::AptitudeTest { year } => validate_choice(year, "year", YEARS),
            Cohort::WeeklyQuiz {
                year,
                semester,
                branch,
            } => validate_choice(year, "year", YEARS)
                .and_then(|()| validate_choice(semester, "semester", SEMESTERS))
                .and_then(|()| validate_choice(branch, "branch", BRANCHES)),
        };

        cohort
            .and_then(|()| validate_required(&self.title, "Title"))
            .and_then(|()| validate_required(&self.description, "Description"))
            .and_then(|()| validate_required(&self.topics, "Topics"))
            .and_then(|()| validate_required(&self.duration, "Duration"))
            .and_then(|()| {
                if self.total_questions < 1 {
                    return Err("Total questions must be at least 1".to_string());
                }
                Ok(())
            })
            .and_then(|()| validate_form_link(&self.form_link))
            .map_err(Error::BadRequest)
    }

    fn normalized_cohort(&self) -> Cohort {
        match &self.cohort {
            Cohort::AptitudeTest { year } => Cohort::AptitudeTest {
                year: canonical(year, YEARS),
            },
            Cohort::WeeklyQuiz {
                year,
                semester,
                branch,
            } => Cohort::WeeklyQuiz {
                year: canonical(year, YEARS),
                semester: canonical(semester, SEMESTERS),
                branch: canonical(branch, BRANCHES),
            },
        }
    }
}

/// Validates and stores an announcement, stamping its expiry from `now`.
pub fn publish_announcement(
    store: &dyn Store,
    draft: &AnnouncementDraft,
    now: DateTime<Utc>,
) -> Result<i64> {
    draft.validate()?;
    let expire_at = draft.expire_at(now)?;

    let announcement = NewAnnouncement {
        cohort: draft.normalized_cohort(),
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        topics: draft.topics.trim().to_string(),
        duration: draft.duration.trim().to_string(),
        total_questions: draft.total_questions,
        form_link: draft.form_link.trim().to_string(),
        uploaded_at: now,
        expire_at,
    };

    let id = store.insert_announcement(&announcement)?;
    tracing::info!(
        kind = %draft.cohort.kind(),
        id,
        expire_at = %announcement.expire_at,
        "Published announcement"
    );
    Ok(id)
}

pub fn delete_announcement(store: &dyn Store, kind: AnnouncementKind, id: i64) -> Result<()> {
    if !store.delete_announcement(kind, id)? {
        return Err(Error::NotFound);
    }
    tracing::info!(kind = %kind, id, "Deleted announcement");
    Ok(())
}
