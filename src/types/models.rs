use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Table;

/// The three document shapes, one table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "papers")]
    ExamPaper,
    #[serde(rename = "notes")]
    SubjectNote,
    #[serde(rename = "assignments")]
    Assignment,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::ExamPaper,
        DocumentKind::SubjectNote,
        DocumentKind::Assignment,
    ];

    #[must_use]
    pub const fn table(self) -> Table {
        match self {
            DocumentKind::ExamPaper => Table::ExamPapers,
            DocumentKind::SubjectNote => Table::SubjectNotes,
            DocumentKind::Assignment => Table::Assignments,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DocumentKind::ExamPaper => "papers",
            DocumentKind::SubjectNote => "notes",
            DocumentKind::Assignment => "assignments",
        }
    }

    /// Category columns of this kind, in storage order.
    #[must_use]
    pub const fn category_columns(self) -> &'static [&'static str] {
        match self {
            DocumentKind::ExamPaper => &["regulation", "year", "semester", "paper_type"],
            DocumentKind::SubjectNote => &["subject", "regulation", "year"],
            DocumentKind::Assignment => &["branch", "year", "semester", "subject", "unit"],
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "papers" => Ok(DocumentKind::ExamPaper),
            "notes" => Ok(DocumentKind::SubjectNote),
            "assignments" => Ok(DocumentKind::Assignment),
            other => Err(format!("unknown document kind: {other}")),
        }
    }
}

/// Category attributes of a document. Together with the filename they form
/// the document's uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Category {
    ExamPaper {
        regulation: String,
        year: String,
        semester: String,
        paper_type: String,
    },
    SubjectNote {
        subject: String,
        regulation: String,
        year: String,
    },
    Assignment {
        branch: String,
        year: String,
        semester: String,
        subject: String,
        unit: String,
    },
}

impl Category {
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Category::ExamPaper { .. } => DocumentKind::ExamPaper,
            Category::SubjectNote { .. } => DocumentKind::SubjectNote,
            Category::Assignment { .. } => DocumentKind::Assignment,
        }
    }

    /// Column/value pairs in the order given by [`DocumentKind::category_columns`].
    #[must_use]
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let values: Vec<&String> = match self {
            Category::ExamPaper {
                regulation,
                year,
                semester,
                paper_type,
            } => vec![regulation, year, semester, paper_type],
            Category::SubjectNote {
                subject,
                regulation,
                year,
            } => vec![subject, regulation, year],
            Category::Assignment {
                branch,
                year,
                semester,
                subject,
                unit,
            } => vec![branch, year, semester, subject, unit],
        };
        self.kind()
            .category_columns()
            .iter()
            .copied()
            .zip(values.into_iter().cloned())
            .collect()
    }

    /// Free-text field searched alongside the filename, if the shape has one.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Category::ExamPaper { .. } => None,
            Category::SubjectNote { subject, .. } | Category::Assignment { subject, .. } => {
                Some(subject.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    #[serde(flatten)]
    pub category: Category,
    #[serde(skip)]
    pub payload: String,
    pub compressed: bool,
    pub size_bytes: i64,
    pub checksum: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A document row before the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub category: Category,
    pub payload: String,
    pub compressed: bool,
    pub size_bytes: i64,
    pub checksum: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Identifier and filename only, for admin search listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub filename: String,
}

/// Tags an exam paper to one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchLink {
    pub paper_id: i64,
    pub branch: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnouncementKind {
    #[serde(rename = "aptitude-tests")]
    AptitudeTest,
    #[serde(rename = "weekly-quizzes")]
    WeeklyQuiz,
}

impl AnnouncementKind {
    pub const ALL: [AnnouncementKind; 2] =
        [AnnouncementKind::AptitudeTest, AnnouncementKind::WeeklyQuiz];

    #[must_use]
    pub const fn table(self) -> Table {
        match self {
            AnnouncementKind::AptitudeTest => Table::AptitudeTests,
            AnnouncementKind::WeeklyQuiz => Table::WeeklyQuizzes,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AnnouncementKind::AptitudeTest => "aptitude-tests",
            AnnouncementKind::WeeklyQuiz => "weekly-quizzes",
        }
    }

    #[must_use]
    pub const fn cohort_columns(self) -> &'static [&'static str] {
        match self {
            AnnouncementKind::AptitudeTest => &["year"],
            AnnouncementKind::WeeklyQuiz => &["year", "semester", "branch"],
        }
    }
}

impl fmt::Display for AnnouncementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnouncementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aptitude-tests" => Ok(AnnouncementKind::AptitudeTest),
            "weekly-quizzes" => Ok(AnnouncementKind::WeeklyQuiz),
            other => Err(format!("unknown announcement kind: {other}")),
        }
    }
}

/// Which students an announcement targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cohort {
    AptitudeTest {
        year: String,
    },
    WeeklyQuiz {
        year: String,
        semester: String,
        branch: String,
    },
}

impl Cohort {
    #[must_use]
    pub fn kind(&self) -> AnnouncementKind {
        match self {
            Cohort::AptitudeTest { .. } => AnnouncementKind::AptitudeTest,
            Cohort::WeeklyQuiz { .. } => AnnouncementKind::WeeklyQuiz,
        }
    }

    #[must_use]
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Cohort::AptitudeTest { year } => vec![("year", year.clone())],
            Cohort::WeeklyQuiz {
                year,
                semester,
                branch,
            } => vec![
                ("year", year.clone()),
                ("semester", semester.clone()),
                ("branch", branch.clone()),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Announcement {
    pub id: i64,
    #[serde(flatten)]
    pub cohort: Cohort,
    pub title: String,
    pub description: String,
    pub topics: String,
    pub duration: String,
    pub total_questions: i64,
    pub form_link: String,
    pub uploaded_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
}

impl Announcement {
    /// Topics are stored comma-joined.
    #[must_use]
    pub fn topic_list(&self) -> Vec<String> {
        self.topics
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub cohort: Cohort,
    pub title: String,
    pub description: String,
    pub topics: String,
    pub duration: String,
    pub total_questions: i64,
    pub form_link: String,
    pub uploaded_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
}

/// The single shared admin identity.
#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Upload and download counts for one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyActivity {
    pub month: u32,
    pub exam_papers: i64,
    pub subject_notes: i64,
    pub assignments: i64,
    pub downloads: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_attributes_follow_column_order() {
        let category = Category::Assignment {
            branch: "CSE".into(),
            year: "2nd Year".into(),
            semester: "1 Semester".into(),
            subject: "Dbms".into(),
            unit: "1st Unit".into(),
        };
        let attrs = category.attributes();
        let columns: Vec<_> = attrs.iter().map(|(c, _)| *c).collect();
        assert_eq!(columns, DocumentKind::Assignment.category_columns());
        assert_eq!(attrs[3].1, "Dbms");
    }

    #[test]
    fn test_topic_list_trims_and_skips_blanks() {
        let now = Utc::now();
        let announcement = Announcement {
            id: 1,
            cohort: Cohort::AptitudeTest {
                year: "1st Year".into(),
            },
            title: "Mock".into(),
            description: "d".into(),
            topics: " Percentages, Ratios ,,Time & Work ".into(),
            duration: "30 minutes".into(),
            total_questions: 20,
            form_link: "https://forms.example/x".into(),
            uploaded_at: now,
            expire_at: now,
        };
        assert_eq!(
            announcement.topic_list(),
            vec!["Percentages", "Ratios", "Time & Work"]
        );
    }

    #[test]
    fn test_document_kind_round_trips_through_str() {
        for kind in DocumentKind::ALL {
            assert_eq!(kind.as_str().parse::<DocumentKind>().unwrap(), kind);
        }
        assert!("pdfs".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_announcement_kind_matches_serde_name() {
        for kind in AnnouncementKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
            assert_eq!(kind.as_str().parse::<AnnouncementKind>().unwrap(), kind);
        }
    }
}
