use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pages a client can navigate to, named as they appear in the navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Page {
    #[default]
    Home,
    #[serde(rename = "Question Papers")]
    QuestionPapers,
    #[serde(rename = "Subject Notes")]
    SubjectNotes,
    Assignments,
    #[serde(rename = "Aptitude Test")]
    AptitudeTest,
    #[serde(rename = "Weekly Quiz")]
    WeeklyQuiz,
    #[serde(rename = "Admin Login")]
    AdminLogin,
    #[serde(rename = "Admin Dashboard")]
    AdminDashboard,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Home,
        Page::QuestionPapers,
        Page::SubjectNotes,
        Page::Assignments,
        Page::AptitudeTest,
        Page::WeeklyQuiz,
        Page::AdminLogin,
        Page::AdminDashboard,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::QuestionPapers => "Question Papers",
            Page::SubjectNotes => "Subject Notes",
            Page::Assignments => "Assignments",
            Page::AptitudeTest => "Aptitude Test",
            Page::WeeklyQuiz => "Weekly Quiz",
            Page::AdminLogin => "Admin Login",
            Page::AdminDashboard => "Admin Dashboard",
        }
    }

    /// Visiting these pages purges expired announcements first.
    #[must_use]
    pub const fn sweeps_announcements(self) -> bool {
        matches!(
            self,
            Page::QuestionPapers | Page::AptitudeTest | Page::WeeklyQuiz
        )
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown page: {s}"))
    }
}

/// What a client should render for the current session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    PaperFinder,
    NoteFinder,
    AssignmentFinder,
    AptitudeTest,
    WeeklyQuiz,
    LoginForm,
    AdminPanel,
    AdminDashboard,
    LoginRequired,
}

/// Per-client state: the selected page and the admin login flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    pub page: Page,
    pub logged_in: bool,
}

impl Session {
    /// Maps the selected page to a view, gating admin pages on the login flag.
    #[must_use]
    pub fn view(&self) -> View {
        match self.page {
            Page::Home => View::Home,
            Page::QuestionPapers => View::PaperFinder,
            Page::SubjectNotes => View::NoteFinder,
            Page::Assignments => View::AssignmentFinder,
            Page::AptitudeTest => View::AptitudeTest,
            Page::WeeklyQuiz => View::WeeklyQuiz,
            Page::AdminLogin if self.logged_in => View::AdminPanel,
            Page::AdminLogin => View::LoginForm,
            Page::AdminDashboard if self.logged_in => View::AdminDashboard,
            Page::AdminDashboard => View::LoginRequired,
        }
    }
}
