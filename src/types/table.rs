use std::fmt;

/// Logical tables of the portal store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    ExamPapers,
    SubjectNotes,
    Assignments,
    PaperBranches,
    AptitudeTests,
    WeeklyQuizzes,
    Downloads,
}

const DOCUMENT_COMMON: [&str; 6] = [
    "id",
    "filename",
    "filedata",
    "compressed",
    "size_bytes",
    "checksum",
];

impl Table {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Table::ExamPapers => "exam_papers",
            Table::SubjectNotes => "subject_notes",
            Table::Assignments => "assignments",
            Table::PaperBranches => "paper_branches",
            Table::AptitudeTests => "aptitude_tests",
            Table::WeeklyQuizzes => "weekly_quizzes",
            Table::Downloads => "downloads",
        }
    }

    /// Columns that may appear in a predicate against this table.
    #[must_use]
    pub fn columns(self) -> Vec<&'static str> {
        let specific: &[&str] = match self {
            Table::ExamPapers => &["regulation", "year", "semester", "paper_type", "uploaded_at"],
            Table::SubjectNotes => &["subject", "regulation", "year", "uploaded_at"],
            Table::Assignments => &[
                "branch",
                "year",
                "semester",
                "subject",
                "unit",
                "uploaded_at",
            ],
            Table::PaperBranches => return vec!["paper_id", "branch"],
            Table::AptitudeTests => return announcement_columns(&["year"]),
            Table::WeeklyQuizzes => return announcement_columns(&["year", "semester", "branch"]),
            Table::Downloads => return vec!["id", "kind", "document_id", "downloaded_at"],
        };
        DOCUMENT_COMMON.iter().chain(specific).copied().collect()
    }

    #[must_use]
    pub fn has_column(self, column: &str) -> bool {
        self.columns().contains(&column)
    }
}

fn announcement_columns(cohort: &[&'static str]) -> Vec<&'static str> {
    let mut columns = vec!["id"];
    columns.extend_from_slice(cohort);
    columns.extend_from_slice(&[
        "title",
        "description",
        "topics",
        "duration",
        "total_questions",
        "form_link",
        "uploaded_at",
        "expire_at",
    ]);
    columns
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
