use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use super::Store;
use super::predicate::{Clause, Predicate};
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Reads a timestamp column written by `format_datetime`.
fn get_datetime(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            let index = row.as_ref().column_index(column).unwrap_or_default();
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
        })
}

/// Fixed-width UTC timestamps, so `<` on the stored text orders by time.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Renders a predicate as a WHERE clause, appending its bound values to `values`.
fn render_where(table: Table, predicate: &Predicate, values: &mut Vec<Value>) -> Result<String> {
    if predicate.is_empty() {
        return Ok(String::new());
    }

    let mut parts = Vec::with_capacity(predicate.clauses().len());
    for clause in predicate.clauses() {
        let column = clause.column();
        if !table.has_column(column) {
            return Err(Error::UnknownColumn {
                table: table.name(),
                column,
            });
        }

        match clause {
            Clause::Eq(_, value) => {
                parts.push(format!("{column} = ?"));
                values.push(Value::Text(value.clone()));
            }
            Clause::LinkedToBranch(_, branch) => {
                parts.push(format!(
                    "{column} IN (SELECT paper_id FROM paper_branches WHERE branch = ?)"
                ));
                values.push(Value::Text(branch.clone()));
            }
        }
    }

    Ok(format!(" WHERE {}", parts.join(" AND ")))
}

fn document_columns(kind: DocumentKind) -> String {
    format!(
        "id, filename, {}, filedata, compressed, size_bytes, checksum, uploaded_at",
        kind.category_columns().join(", ")
    )
}

fn row_to_document(kind: DocumentKind, row: &Row<'_>) -> rusqlite::Result<Document> {
    let text = |name: &str| row.get::<_, String>(name);

    let category = match kind {
        DocumentKind::ExamPaper => Category::ExamPaper {
            regulation: text("regulation")?,
            year: text("year")?,
            semester: text("semester")?,
            paper_type: text("paper_type")?,
        },
        DocumentKind::SubjectNote => Category::SubjectNote {
            subject: text("subject")?,
            regulation: text("regulation")?,
            year: text("year")?,
        },
        DocumentKind::Assignment => Category::Assignment {
            branch: text("branch")?,
            year: text("year")?,
            semester: text("semester")?,
            subject: text("subject")?,
            unit: text("unit")?,
        },
    };

    Ok(Document {
        id: row.get("id")?,
        filename: text("filename")?,
        category,
        payload: text("filedata")?,
        compressed: row.get("compressed")?,
        size_bytes: row.get("size_bytes")?,
        checksum: text("checksum")?,
        uploaded_at: get_datetime(row, "uploaded_at")?,
    })
}

fn announcement_columns(kind: AnnouncementKind) -> String {
    format!(
        "id, {}, title, description, topics, duration, total_questions, form_link, uploaded_at, expire_at",
        kind.cohort_columns().join(", ")
    )
}

fn row_to_announcement(kind: AnnouncementKind, row: &Row<'_>) -> rusqlite::Result<Announcement> {
    let text = |name: &str| row.get::<_, String>(name);

    let cohort = match kind {
        AnnouncementKind::AptitudeTest => Cohort::AptitudeTest {
            year: text("year")?,
        },
        AnnouncementKind::WeeklyQuiz => Cohort::WeeklyQuiz {
            year: text("year")?,
            semester: text("semester")?,
            branch: text("branch")?,
        },
    };

    Ok(Announcement {
        id: row.get("id")?,
        cohort,
        title: text("title")?,
        description: text("description")?,
        topics: text("topics")?,
        duration: text("duration")?,
        total_questions: row.get("total_questions")?,
        form_link: text("form_link")?,
        uploaded_at: get_datetime(row, "uploaded_at")?,
        expire_at: get_datetime(row, "expire_at")?,
    })
}

/// Counts rows per month of `year`, keyed by 1-based month.
fn count_by_month(
    conn: &Connection,
    table: Table,
    time_column: &str,
    year: i32,
) -> Result<Vec<(u32, i64)>> {
    let sql = format!(
        "SELECT CAST(substr({time_column}, 6, 2) AS INTEGER) AS month, COUNT(*)
         FROM {table} WHERE substr({time_column}, 1, 4) = ?1 GROUP BY month"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![format!("{year:04}")], |row| {
        Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)?))
    })?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::from)
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Predicate operations

    fn exists(&self, table: Table, predicate: &Predicate) -> Result<bool> {
        let mut values = Vec::new();
        let filter = render_where(table, predicate, &mut values)?;
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {table}{filter})");

        let conn = self.conn();
        let found: bool = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
        Ok(found)
    }

    fn count(&self, table: Table) -> Result<i64> {
        let conn = self.conn();
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count)
    }

    // Document operations

    fn insert_document(&self, doc: &NewDocument) -> Result<i64> {
        let kind = doc.category.kind();
        let attributes = doc.category.attributes();

        let mut columns = vec!["filename"];
        let mut values = vec![Value::Text(doc.filename.clone())];
        for (column, value) in attributes {
            columns.push(column);
            values.push(Value::Text(value));
        }
        columns.extend(["filedata", "compressed", "size_bytes", "checksum", "uploaded_at"]);
        values.extend([
            Value::Text(doc.payload.clone()),
            Value::Integer(i64::from(doc.compressed)),
            Value::Integer(doc.size_bytes),
            Value::Text(doc.checksum.clone()),
            Value::Text(format_datetime(&doc.uploaded_at)),
        ]);

        let marks = vec!["?"; values.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({marks})",
            kind.table(),
            columns.join(", ")
        );

        let conn = self.conn();
        conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(conn.last_insert_rowid())
    }

    fn get_document(&self, kind: DocumentKind, id: i64) -> Result<Option<Document>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            document_columns(kind),
            kind.table()
        );

        let conn = self.conn();
        conn.query_row(&sql, params![id], |row| row_to_document(kind, row))
            .optional()
            .map_err(Error::from)
    }

    fn find_documents(&self, kind: DocumentKind, predicate: &Predicate) -> Result<Vec<Document>> {
        let mut values = Vec::new();
        let filter = render_where(kind.table(), predicate, &mut values)?;
        let sql = format!(
            "SELECT {} FROM {}{filter} ORDER BY id",
            document_columns(kind),
            kind.table()
        );

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            row_to_document(kind, row)
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_document_summaries(&self, kind: DocumentKind) -> Result<Vec<DocumentSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT id, filename FROM {} ORDER BY id",
            kind.table()
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok(DocumentSummary {
                id: row.get(0)?,
                filename: row.get(1)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_document(&self, kind: DocumentKind, id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
            params![id],
        )?;
        Ok(rows > 0)
    }

    // Paper-branch M2M operations

    fn add_branch_link(&self, link: &BranchLink) -> Result<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO paper_branches (paper_id, branch) VALUES (?1, ?2)",
            params![link.paper_id, link.branch],
        )?;
        Ok(())
    }

    fn list_paper_branches(&self, paper_id: i64) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT branch FROM paper_branches WHERE paper_id = ?1 ORDER BY branch")?;
        let rows = stmt.query_map(params![paper_id], |row| row.get(0))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Announcement operations

    fn insert_announcement(&self, announcement: &NewAnnouncement) -> Result<i64> {
        let kind = announcement.cohort.kind();

        let mut columns = Vec::new();
        let mut values = Vec::new();
        for (column, value) in announcement.cohort.attributes() {
            columns.push(column);
            values.push(Value::Text(value));
        }
        columns.extend([
            "title",
            "description",
            "topics",
            "duration",
            "total_questions",
            "form_link",
            "uploaded_at",
            "expire_at",
        ]);
        values.extend([
            Value::Text(announcement.title.clone()),
            Value::Text(announcement.description.clone()),
            Value::Text(announcement.topics.clone()),
            Value::Text(announcement.duration.clone()),
            Value::Integer(announcement.total_questions),
            Value::Text(announcement.form_link.clone()),
            Value::Text(format_datetime(&announcement.uploaded_at)),
            Value::Text(format_datetime(&announcement.expire_at)),
        ]);

        let marks = vec!["?"; values.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({marks})",
            kind.table(),
            columns.join(", ")
        );

        let conn = self.conn();
        conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(conn.last_insert_rowid())
    }

    fn find_announcements(
        &self,
        kind: AnnouncementKind,
        predicate: &Predicate,
        limit: i64,
    ) -> Result<Vec<Announcement>> {
        let mut values = Vec::new();
        let filter = render_where(kind.table(), predicate, &mut values)?;
        values.push(Value::Integer(limit));
        let sql = format!(
            "SELECT {} FROM {}{filter} ORDER BY uploaded_at DESC, id DESC LIMIT ?",
            announcement_columns(kind),
            kind.table()
        );

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            row_to_announcement(kind, row)
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_announcement(&self, kind: AnnouncementKind, id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
            params![id],
        )?;
        Ok(rows > 0)
    }

    fn delete_announcements_expired_before(
        &self,
        kind: AnnouncementKind,
        cutoff: DateTime<Utc>,
    ) -> Result<usize> {
        let rows = self.conn().execute(
            &format!("DELETE FROM {} WHERE expire_at < ?1", kind.table()),
            params![format_datetime(&cutoff)],
        )?;
        Ok(rows)
    }

    // Download tracking

    fn record_download(&self, kind: DocumentKind, id: i64, at: DateTime<Utc>) -> Result<()> {
        self.conn().execute(
            "INSERT INTO downloads (kind, document_id, downloaded_at) VALUES (?1, ?2, ?3)",
            params![kind.as_str(), id, format_datetime(&at)],
        )?;
        Ok(())
    }

    fn monthly_activity(&self, year: i32) -> Result<Vec<MonthlyActivity>> {
        let mut months: Vec<MonthlyActivity> = (1..=12)
            .map(|month| MonthlyActivity {
                month,
                ..MonthlyActivity::default()
            })
            .collect();

        let conn = self.conn();
        let sources = [
            (Table::ExamPapers, "uploaded_at"),
            (Table::SubjectNotes, "uploaded_at"),
            (Table::Assignments, "uploaded_at"),
            (Table::Downloads, "downloaded_at"),
        ];

        for (table, column) in sources {
            for (month, count) in count_by_month(&conn, table, column, year)? {
                let Some(entry) = months.get_mut(month.saturating_sub(1) as usize) else {
                    continue;
                };
                match table {
                    Table::ExamPapers => entry.exam_papers = count,
                    Table::SubjectNotes => entry.subject_notes = count,
                    Table::Assignments => entry.assignments = count,
                    _ => entry.downloads = count,
                }
            }
        }

        Ok(months)
    }

    // Admin credential

    fn get_admin_credential(&self) -> Result<Option<AdminCredential>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT username, password_hash, created_at FROM admin_credentials WHERE id = 1",
            [],
            |row| {
                Ok(AdminCredential {
                    username: row.get(0)?,
                    password_hash: row.get(1)?,
                    created_at: get_datetime(row, "created_at")?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn set_admin_credential(&self, credential: &AdminCredential) -> Result<()> {
        self.conn().execute(
            "INSERT INTO admin_credentials (id, username, password_hash, created_at)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                password_hash = excluded.password_hash,
                created_at = excluded.created_at",
            params![
                credential.username,
                credential.password_hash,
                format_datetime(&credential.created_at),
            ],
        )?;
        Ok(())
    }

    fn has_admin_credential(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 =
            conn.query_row("SELECT COUNT(*) FROM admin_credentials", [], |row| row.get(0))?;
        Ok(count > 0)
    }

}
