use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::store::Store;
use crate::types::{MonthlyActivity, Table};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub exam_papers: i64,
    pub subject_notes: i64,
    pub assignments: i64,
    pub aptitude_tests: i64,
    pub weekly_quizzes: i64,
    pub downloads: i64,
    pub year: i32,
    /// Twelve entries, January first.
    pub activity: Vec<MonthlyActivity>,
}

/// Gathers table counts and month-by-month activity for `year`
/// (the current year when `None`).
pub fn dashboard_stats(
    store: &dyn Store,
    year: Option<i32>,
    now: DateTime<Utc>,
) -> Result<DashboardStats> {
    let year = year.unwrap_or_else(|| now.year());

    Ok(DashboardStats {
        exam_papers: store.count(Table::ExamPapers)?,
        subject_notes: store.count(Table::SubjectNotes)?,
        assignments: store.count(Table::Assignments)?,
        aptitude_tests: store.count(Table::AptitudeTests)?,
        weekly_quizzes: store.count(Table::WeeklyQuizzes)?,
        downloads: store.count(Table::Downloads)?,
        year,
        activity: store.monthly_activity(year)?,
    })
}
