use chrono::Utc;
use serde::Serialize;

use crate::portal::{DashboardStats, dashboard_stats};
use crate::store::Store;

use super::init_store;

#[derive(Serialize)]
struct AdminOutput {
    username: String,
    created_at: String,
}

#[derive(Serialize)]
struct PortalInfo {
    admin: Option<AdminOutput>,
    #[serde(flatten)]
    stats: DashboardStats,
}

pub fn run_info(data_dir: String, json: bool) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let admin = store.get_admin_credential()?.map(|credential| AdminOutput {
        username: credential.username,
        created_at: credential.created_at.to_rfc3339(),
    });
    let stats = dashboard_stats(&store, None, Utc::now())?;

    if json {
        let info = PortalInfo { admin, stats };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!();
    println!("ExamBuddy Portal Status");
    println!("{}", "─".repeat(23));
    match &admin {
        Some(admin) => println!("Admin:           {} (since {})", admin.username, admin.created_at),
        None => println!("Admin:           <not initialized>"),
    }
    println!("Exam papers:     {}", stats.exam_papers);
    println!("Subject notes:   {}", stats.subject_notes);
    println!("Assignments:     {}", stats.assignments);
    println!("Aptitude tests:  {}", stats.aptitude_tests);
    println!("Weekly quizzes:  {}", stats.weekly_quizzes);
    println!("Downloads:       {}", stats.downloads);
    println!();

    Ok(())
}
