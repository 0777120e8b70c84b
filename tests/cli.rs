//! CLI integration tests for exambuddy admin commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_fs::TempDir;
use chrono::{Duration, Utc};
use exambuddy::store::{SqliteStore, Store};
use exambuddy::types::{Cohort, NewAnnouncement};
use predicates::prelude::*;
use serde_json::Value;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn db_path(&self) -> PathBuf {
        self.data_dir().join("exambuddy.db")
    }

    fn password_path(&self) -> PathBuf {
        self.data_dir().join(".admin_password")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("exambuddy").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "init",
                "--data-dir",
                &self.data_dir_str(),
                "--non-interactive",
            ])
            .assert()
    }

    fn info_json(&self) -> Value {
        let output = self
            .cmd()
            .args([
                "admin",
                "info",
                "--data-dir",
                &self.data_dir_str(),
                "--json",
            ])
            .output()
            .expect("failed to run command");

        serde_json::from_slice(&output.stdout).expect("failed to parse JSON")
    }

    fn store(&self) -> SqliteStore {
        SqliteStore::new(self.db_path()).expect("failed to open store")
    }
}

fn announcement(cohort: Cohort, expire_in: Duration) -> NewAnnouncement {
    let now = Utc::now();
    NewAnnouncement {
        cohort,
        title: "Mock".to_string(),
        description: "Practice round".to_string(),
        topics: "Ratios".to_string(),
        duration: "30 minutes".to_string(),
        total_questions: 20,
        form_link: "https://forms.example/mock".to_string(),
        uploaded_at: now - Duration::days(8),
        expire_at: now + expire_in,
    }
}

#[test]
fn test_init_non_interactive_generates_password() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("Admin username: admin"))
        .stdout(predicate::str::contains("save this"));

    assert!(ctx.db_path().exists());
    let password = std::fs::read_to_string(ctx.password_path()).expect("password file");
    assert_eq!(password.len(), 24);
    assert!(password.chars().all(|c| c.is_ascii_hexdigit()));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(ctx.password_path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    let info = ctx.info_json();
    assert_eq!(info["admin"]["username"], "admin");
}

#[test]
fn test_init_twice_fails() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.init()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_init_with_explicit_credentials() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args([
            "admin",
            "init",
            "--data-dir",
            &ctx.data_dir_str(),
            "--username",
            "registrar",
            "--password",
            "correct-horse",
            "--non-interactive",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Admin username: registrar"))
        .stdout(predicate::str::contains("save this").not());

    let password = std::fs::read_to_string(ctx.password_path()).expect("password file");
    assert_eq!(password, "correct-horse");
    assert_eq!(ctx.info_json()["admin"]["username"], "registrar");
}

#[test]
fn test_init_rejects_short_password() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args([
            "admin",
            "init",
            "--data-dir",
            &ctx.data_dir_str(),
            "--password",
            "short",
            "--non-interactive",
        ])
        .assert()
        .failure();

    assert!(!ctx.password_path().exists());
}

#[test]
fn test_info_reports_counts() {
    let ctx = TestContext::new();
    ctx.init().success();

    let store = ctx.store();
    store
        .insert_announcement(&announcement(
            Cohort::AptitudeTest {
                year: "2nd Year".to_string(),
            },
            Duration::hours(4),
        ))
        .expect("insert announcement");

    let info = ctx.info_json();
    assert_eq!(info["exam_papers"], 0);
    assert_eq!(info["aptitude_tests"], 1);
    assert_eq!(info["weekly_quizzes"], 0);
    assert_eq!(info["activity"].as_array().expect("activity").len(), 12);

    ctx.cmd()
        .args(["admin", "info", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ExamBuddy Portal Status"))
        .stdout(predicate::str::contains("Aptitude tests:  1"));
}

#[test]
fn test_info_without_init_fails() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["admin", "info", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not found"));
}

#[test]
fn test_sweep_removes_expired_announcements() {
    let ctx = TestContext::new();
    ctx.init().success();

    let store = ctx.store();
    let quiz = |branch: &str| Cohort::WeeklyQuiz {
        year: "3rd Year".to_string(),
        semester: "2 Semester".to_string(),
        branch: branch.to_string(),
    };
    store
        .insert_announcement(&announcement(quiz("CSE"), -Duration::hours(1)))
        .expect("insert expired quiz");
    store
        .insert_announcement(&announcement(quiz("IT"), Duration::days(2)))
        .expect("insert live quiz");
    store
        .insert_announcement(&announcement(
            Cohort::AptitudeTest {
                year: "3rd Year".to_string(),
            },
            -Duration::minutes(5),
        ))
        .expect("insert expired test");

    ctx.cmd()
        .args(["admin", "sweep", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Removed 1 expired aptitude test(s) and 1 expired weekly quiz(zes)",
        ));

    let info = ctx.info_json();
    assert_eq!(info["aptitude_tests"], 0);
    assert_eq!(info["weekly_quizzes"], 1);
}

#[test]
fn test_serve_requires_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["serve", "--data-dir", &ctx.data_dir_str(), "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Portal not initialized"));
}
