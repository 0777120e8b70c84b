//! # ExamBuddy
//!
//! A study-material portal: past exam papers, subject notes, assignments and
//! time-limited quiz announcements, usable both as a standalone binary and as
//! a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! exambuddy = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use exambuddy::config::ServerConfig;
//! use exambuddy::server::{AppState, create_router};
//! use exambuddy::store::{SqliteStore, Store};
//!
//! let config = ServerConfig::default();
//! let store = SqliteStore::new(config.db_path()).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), &config));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod payload;
pub mod portal;
pub mod server;
pub mod session;
pub mod store;
pub mod types;
