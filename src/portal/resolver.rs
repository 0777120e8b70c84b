use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::store::{Predicate, Store};
use crate::types::catalog;
use crate::types::{Announcement, AnnouncementKind, Category, Document, DocumentKind, Table};

use super::sweep::sweep_expired;

pub const INCOMPLETE_PROMPT: &str = "Please select all fields to continue.";

pub const APTITUDE_TEST_LIMIT: i64 = 1;
pub const WEEKLY_QUIZ_LIMIT: i64 = 10;

/// Outcome of a filtered listing.
#[derive(Debug, Clone)]
pub enum Resolution<T> {
    /// A required selector was missing; no query was issued.
    Incomplete { missing: Vec<&'static str> },
    Resolved(Vec<T>),
}

impl<T> Resolution<T> {
    fn incomplete(selectors: &[(&'static str, Option<&str>)]) -> Self {
        Resolution::Incomplete {
            missing: selectors
                .iter()
                .filter(|(_, value)| value.is_none())
                .map(|(name, _)| *name)
                .collect(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Incomplete { missing } => Resolution::Incomplete { missing },
            Resolution::Resolved(items) => Resolution::Resolved(items.into_iter().map(f).collect()),
        }
    }

    #[must_use]
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Resolution::Incomplete { .. } => None,
            Resolution::Resolved(items) => Some(items),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaperQuery {
    pub branch: Option<String>,
    pub regulation: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub paper_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteQuery {
    pub regulation: Option<String>,
    pub year: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentQuery {
    pub branch: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub unit: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnouncementQuery {
    pub year: Option<String>,
    pub semester: Option<String>,
    pub branch: Option<String>,
}

fn selected(value: &Option<String>) -> Option<&str> {
    let value = value.as_deref();
    if catalog::is_unset(value) {
        None
    } else {
        value.map(str::trim)
    }
}

fn needle(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Keeps the first document seen for each filename, preserving order.
#[must_use]
pub fn dedupe_by_filename(documents: Vec<Document>) -> Vec<Document> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| seen.insert(doc.filename.clone()))
        .collect()
}

pub fn resolve_papers(store: &dyn Store, query: &PaperQuery) -> Result<Resolution<Document>> {
    let branch = selected(&query.branch);
    let regulation = selected(&query.regulation);
    let year = selected(&query.year);
    let semester = selected(&query.semester);
    let paper_type = selected(&query.paper_type);

    let (Some(branch), Some(regulation), Some(year), Some(semester), Some(paper_type)) =
        (branch, regulation, year, semester, paper_type)
    else {
        return Ok(Resolution::incomplete(&[
            ("branch", branch),
            ("regulation", regulation),
            ("year", year),
            ("semester", semester),
            ("paper_type", paper_type),
        ]));
    };

    if !store.exists(Table::PaperBranches, &Predicate::new().eq("branch", branch))? {
        return Ok(Resolution::Resolved(Vec::new()));
    }

    let predicate = Predicate::new()
        .linked_to_branch("id", branch)
        .eq("regulation", regulation)
        .eq("year", year)
        .eq("semester", semester)
        .eq("paper_type", catalog::normalize_paper_type(paper_type));

    let mut papers = store.find_documents(DocumentKind::ExamPaper, &predicate)?;
    if let Some(needle) = needle(&query.search) {
        papers.retain(|doc| contains_ci(&doc.filename, &needle));
    }

    Ok(Resolution::Resolved(dedupe_by_filename(papers)))
}

pub fn resolve_notes(store: &dyn Store, query: &NoteQuery) -> Result<Resolution<Document>> {
    let regulation = selected(&query.regulation);
    let year = selected(&query.year);

    let (Some(regulation), Some(year)) = (regulation, year) else {
        return Ok(Resolution::incomplete(&[
            ("regulation", regulation),
            ("year", year),
        ]));
    };

    let predicate = Predicate::new()
        .eq("regulation", regulation)
        .eq("year", year);

    let mut notes = store.find_documents(DocumentKind::SubjectNote, &predicate)?;
    if let Some(needle) = needle(&query.search) {
        notes.retain(|doc| {
            doc.category
                .subject()
                .is_some_and(|subject| contains_ci(subject, &needle))
                || contains_ci(&doc.filename, &needle)
        });
    }

    Ok(Resolution::Resolved(dedupe_by_filename(notes)))
}

pub fn resolve_assignments(
    store: &dyn Store,
    query: &AssignmentQuery,
) -> Result<Resolution<Document>> {
    let branch = selected(&query.branch);
    let year = selected(&query.year);
    let semester = selected(&query.semester);

    let (Some(branch), Some(year), Some(semester)) = (branch, year, semester) else {
        return Ok(Resolution::incomplete(&[
            ("branch", branch),
            ("year", year),
            ("semester", semester),
        ]));
    };

    let predicate = Predicate::new()
        .eq("branch", branch)
        .eq("year", year)
        .eq("semester", semester);

    let mut assignments = store.find_documents(DocumentKind::Assignment, &predicate)?;

    // "--" here means every unit rather than a missing selector
    if let Some(unit) = selected(&query.unit) {
        assignments.retain(|doc| {
            matches!(
                &doc.category,
                Category::Assignment { unit: stored, .. } if stored.trim().eq_ignore_ascii_case(unit)
            )
        });
    }
    if let Some(needle) = needle(&query.subject) {
        assignments.retain(|doc| {
            doc.category
                .subject()
                .is_some_and(|subject| contains_ci(subject, &needle))
        });
    }

    Ok(Resolution::Resolved(dedupe_by_filename(assignments)))
}

/// Latest aptitude test for a year. Expired announcements are purged first.
pub fn list_aptitude_tests(
    store: &dyn Store,
    query: &AnnouncementQuery,
    now: DateTime<Utc>,
) -> Result<Resolution<Announcement>> {
    sweep_expired(store, now);

    let Some(year) = selected(&query.year) else {
        return Ok(Resolution::Incomplete {
            missing: vec!["year"],
        });
    };

    let predicate = Predicate::new().eq("year", year);
    let tests =
        store.find_announcements(AnnouncementKind::AptitudeTest, &predicate, APTITUDE_TEST_LIMIT)?;
    Ok(Resolution::Resolved(tests))
}

/// Latest weekly quizzes for a year, semester and branch. Expired
/// announcements are purged first.
pub fn list_weekly_quizzes(
    store: &dyn Store,
    query: &AnnouncementQuery,
    now: DateTime<Utc>,
) -> Result<Resolution<Announcement>> {
    sweep_expired(store, now);

    let year = selected(&query.year);
    let semester = selected(&query.semester);
    let branch = selected(&query.branch);

    let (Some(year), Some(semester), Some(branch)) = (year, semester, branch) else {
        return Ok(Resolution::incomplete(&[
            ("year", year),
            ("semester", semester),
            ("branch", branch),
        ]));
    };

    let predicate = Predicate::new()
        .eq("year", year)
        .eq("semester", semester)
        .eq("branch", branch);
    let quizzes =
        store.find_announcements(AnnouncementKind::WeeklyQuiz, &predicate, WEEKLY_QUIZ_LIMIT)?;
    Ok(Resolution::Resolved(quizzes))
}
