mod predicate;
mod schema;
mod sqlite;

pub use predicate::{Clause, Predicate};
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::*;

/// Store defines the table-store interface the portal runs against.
///
/// Every call is independent: nothing spans a duplicate check and the insert
/// that follows it.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Predicate operations
    fn exists(&self, table: Table, predicate: &Predicate) -> Result<bool>;
    fn count(&self, table: Table) -> Result<i64>;

    // Document operations
    fn insert_document(&self, doc: &NewDocument) -> Result<i64>;
    fn get_document(&self, kind: DocumentKind, id: i64) -> Result<Option<Document>>;
    fn find_documents(&self, kind: DocumentKind, predicate: &Predicate) -> Result<Vec<Document>>;
    fn list_document_summaries(&self, kind: DocumentKind) -> Result<Vec<DocumentSummary>>;
    fn delete_document(&self, kind: DocumentKind, id: i64) -> Result<bool>;

    // Paper-branch M2M operations
    fn add_branch_link(&self, link: &BranchLink) -> Result<()>;
    fn list_paper_branches(&self, paper_id: i64) -> Result<Vec<String>>;

    // Announcement operations
    fn insert_announcement(&self, announcement: &NewAnnouncement) -> Result<i64>;
    /// Newest first by `uploaded_at`.
    fn find_announcements(
        &self,
        kind: AnnouncementKind,
        predicate: &Predicate,
        limit: i64,
    ) -> Result<Vec<Announcement>>;
    fn delete_announcement(&self, kind: AnnouncementKind, id: i64) -> Result<bool>;
    /// Deletes rows whose `expire_at` is strictly before `cutoff`.
    fn delete_announcements_expired_before(
        &self,
        kind: AnnouncementKind,
        cutoff: DateTime<Utc>,
    ) -> Result<usize>;

    // Download tracking
    fn record_download(&self, kind: DocumentKind, id: i64, at: DateTime<Utc>) -> Result<()>;
    fn monthly_activity(&self, year: i32) -> Result<Vec<MonthlyActivity>>;

    // Admin credential
    fn get_admin_credential(&self) -> Result<Option<AdminCredential>>;
    fn set_admin_credential(&self, credential: &AdminCredential) -> Result<()>;
    fn has_admin_credential(&self) -> Result<bool>;
}
