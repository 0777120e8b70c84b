//! Portal operations: filtered listings, downloads, admin mutations, the
//! announcement expiry sweep and dashboard figures. HTTP handlers and CLI
//! commands are thin wrappers over these.

pub mod admin;
pub mod asset;
pub mod dashboard;
pub mod resolver;
pub mod sweep;
pub mod validation;

pub use admin::{
    AnnouncementDraft, UploadBatch, UploadFile, UploadOutcome, UploadStatus, UploadSummary,
};
pub use asset::{Asset, load_asset, record_download};
pub use dashboard::{DashboardStats, dashboard_stats};
pub use resolver::{
    AnnouncementQuery, AssignmentQuery, INCOMPLETE_PROMPT, NoteQuery, PaperQuery, Resolution,
};
pub use sweep::{SweepReport, purge_expired, sweep_expired};
