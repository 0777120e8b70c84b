use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::store::Store;
use crate::types::AnnouncementKind;

/// Rows removed by one sweep, per announcement table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub aptitude_tests: usize,
    pub weekly_quizzes: usize,
}

impl SweepReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.aptitude_tests + self.weekly_quizzes
    }

    fn record(&mut self, kind: AnnouncementKind, removed: usize) {
        match kind {
            AnnouncementKind::AptitudeTest => self.aptitude_tests = removed,
            AnnouncementKind::WeeklyQuiz => self.weekly_quizzes = removed,
        }
    }
}

/// Deletes announcements that expired before `now`, stopping at the first error.
pub fn purge_expired(store: &dyn Store, now: DateTime<Utc>) -> Result<SweepReport> {
    let mut report = SweepReport::default();
    for kind in AnnouncementKind::ALL {
        report.record(kind, store.delete_announcements_expired_before(kind, now)?);
    }
    Ok(report)
}

/// Best-effort sweep run on page access. A failing table is logged and skipped.
pub fn sweep_expired(store: &dyn Store, now: DateTime<Utc>) -> SweepReport {
    let mut report = SweepReport::default();
    for kind in AnnouncementKind::ALL {
        match store.delete_announcements_expired_before(kind, now) {
            Ok(removed) => report.record(kind, removed),
            Err(e) => tracing::warn!(table = %kind.table(), "Expiry sweep failed: {e}"),
        }
    }

    if report.total() > 0 {
        tracing::info!(
            aptitude_tests = report.aptitude_tests,
            weekly_quizzes = report.weekly_quizzes,
            "Removed expired announcements"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::store::{Predicate, SqliteStore};
    use crate::types::{Cohort, NewAnnouncement};

    fn announce(store: &SqliteStore, cohort: Cohort, expire_at: DateTime<Utc>) {
        store
            .insert_announcement(&NewAnnouncement {
                cohort,
                title: "t".into(),
                description: "d".into(),
                topics: "x".into(),
                duration: "1h".into(),
                total_questions: 5,
                form_link: "https://forms.example/f".into(),
                uploaded_at: expire_at - Duration::days(1),
                expire_at,
            })
            .unwrap();
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        let now = Utc::now();

        let aptitude = || Cohort::AptitudeTest {
            year: "1st Year".into(),
        };
        let quiz = || Cohort::WeeklyQuiz {
            year: "1st Year".into(),
            semester: "1 Semester".into(),
            branch: "IT".into(),
        };
        announce(&store, aptitude(), now - Duration::seconds(1));
        announce(&store, aptitude(), now + Duration::hours(1));
        announce(&store, quiz(), now - Duration::days(1));
        announce(&store, quiz(), now - Duration::days(2));

        let report = sweep_expired(&store, now);
        assert_eq!(
            report,
            SweepReport {
                aptitude_tests: 1,
                weekly_quizzes: 2
            }
        );

        let left = store
            .find_announcements(AnnouncementKind::AptitudeTest, &Predicate::new(), 10)
            .unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(sweep_expired(&store, now).total(), 0);
    }

    #[test]
    fn test_sweep_swallows_store_failures() {
        // No schema: every delete fails.
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(sweep_expired(&store, Utc::now()), SweepReport::default());
        assert!(purge_expired(&store, Utc::now()).is_err());
    }
}
