use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use exambuddy::auth::{CredentialHasher, generate_password, validate_password};
use exambuddy::cli::{AdminCommands, run_info, run_sweep};
use exambuddy::config::{FileConfig, ServerConfig};
use exambuddy::server::{AppState, create_router};
use exambuddy::store::{SqliteStore, Store};
use exambuddy::types::AdminCredential;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const MIB: usize = 1024 * 1024;

#[cfg(unix)]
fn set_restrictive_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

#[derive(Parser)]
#[command(name = "exambuddy")]
#[command(about = "A study-material portal for past papers, notes and quizzes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to [default: 127.0.0.1]
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to [default: 8080]
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database and config file
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Compress uploads larger than this many MiB [default: 5]
        #[arg(long)]
        compression_threshold_mb: Option<usize>,
    },
}

fn prompt_username() -> anyhow::Result<String> {
    let username = inquire::Text::new("Admin username:")
        .with_default(DEFAULT_ADMIN_USERNAME)
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Err("Username cannot be empty".into())
            } else if input.contains(char::is_whitespace) {
                Err("Username cannot contain whitespace".into())
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;
    Ok(username.trim().to_string())
}

fn prompt_password() -> anyhow::Result<Option<String>> {
    let choose = inquire::Confirm::new("Would you like to choose the admin password?")
        .with_default(false)
        .prompt()?;

    if !choose {
        return Ok(None);
    }

    let password = inquire::Password::new("Admin password:")
        .with_validator(|input: &str| match validate_password(input) {
            Ok(()) => Ok(inquire::validator::Validation::Valid),
            Err(message) => Ok(inquire::validator::Validation::Invalid(message.into())),
        })
        .prompt()?;
    Ok(Some(password))
}

fn run_init(
    data_dir: String,
    username: Option<String>,
    password: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    };
    fs::create_dir_all(&config.data_dir)?;

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let password_file = config.password_path();

    if store.has_admin_credential()? {
        bail!(
            "Portal already initialized. Admin password was written to: {}",
            password_file.display()
        );
    }

    let username = match username {
        Some(username) => username.trim().to_string(),
        None if non_interactive => DEFAULT_ADMIN_USERNAME.to_string(),
        None => prompt_username()?,
    };
    if username.is_empty() || username.contains(char::is_whitespace) {
        bail!("Username cannot be empty or contain whitespace");
    }

    let password = match password {
        Some(password) => Some(password),
        None if non_interactive => None,
        None => prompt_password()?,
    };
    let (password, generated) = match password {
        Some(password) => {
            if let Err(message) = validate_password(&password) {
                bail!(message);
            }
            (password, false)
        }
        None => (generate_password(), true),
    };

    let credential = AdminCredential {
        username: username.clone(),
        password_hash: CredentialHasher::new().hash(&password)?,
        created_at: Utc::now(),
    };
    store.set_admin_credential(&credential)?;
    fs::write(&password_file, &password)?;

    #[cfg(unix)]
    set_restrictive_permissions(&password_file);

    info!("Initialized portal database at {}", config.db_path().display());

    println!();
    println!("========================================");
    println!("Admin username: {username}");
    if generated {
        println!("Admin password (save this, it won't be shown again):");
        println!();
        println!("  {password}");
        println!();
    }
    println!("Password also written to: {}", password_file.display());
    println!("========================================");
    println!();

    Ok(())
}

fn load_config(
    host: Option<String>,
    port: Option<u16>,
    data_dir: String,
    compression_threshold_mb: Option<usize>,
) -> anyhow::Result<ServerConfig> {
    let data_dir = PathBuf::from(data_dir);
    let mut config = ServerConfig {
        data_dir: data_dir.clone(),
        ..ServerConfig::default()
    };
    config.apply(&FileConfig::load(&data_dir)?);

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(mb) = compression_threshold_mb {
        config.compression_threshold_bytes = mb.saturating_mul(MIB);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("exambuddy=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                username,
                password,
                non_interactive,
            } => {
                run_init(data_dir, username, password, non_interactive)?;
            }
            AdminCommands::Info { data_dir, json } => {
                run_info(data_dir, json)?;
            }
            AdminCommands::Sweep { data_dir } => {
                run_sweep(data_dir)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            compression_threshold_mb,
        } => {
            let config = load_config(host, port, data_dir, compression_threshold_mb)?;

            if !config.db_path().exists() {
                bail!(
                    "Portal not initialized. Run 'exambuddy admin init' first to create the database and admin credential."
                );
            }

            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;
            if !store.has_admin_credential()? {
                bail!(
                    "Portal not initialized. Run 'exambuddy admin init' first to create the database and admin credential."
                );
            }

            info!(
                "Compressing uploads above {} bytes",
                config.compression_threshold_bytes
            );

            let state = Arc::new(AppState::new(Arc::new(store), &config));
            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
