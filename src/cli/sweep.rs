use chrono::Utc;

use crate::portal::purge_expired;

use super::init_store;

pub fn run_sweep(data_dir: String) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;
    let report = purge_expired(&store, Utc::now())?;

    tracing::info!(
        aptitude_tests = report.aptitude_tests,
        weekly_quizzes = report.weekly_quizzes,
        "Expiry sweep finished"
    );
    println!(
        "Removed {} expired aptitude test(s) and {} expired weekly quiz(zes)",
        report.aptitude_tests, report.weekly_quizzes
    );

    Ok(())
}
