mod commands;
mod info;
mod sweep;

pub use commands::AdminCommands;
pub use info::run_info;
pub use sweep::run_sweep;

use crate::store::SqliteStore;

/// Initialize store from data directory, checking it exists
pub fn init_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let data_path: std::path::PathBuf = data_dir.into();
    let db_path = data_path.join("exambuddy.db");

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'exambuddy admin init' first.",
            db_path.display()
        );
    }

    SqliteStore::new(&db_path).map_err(Into::into)
}
