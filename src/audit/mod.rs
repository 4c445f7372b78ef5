//! Audit log — SQLite-based history of logins and entry access.
//!
//! Stores a record of every vault operation (login, store, retrieve,
//! failures) in a local SQLite database at `<data dir>/audit.db`.
//! Records carry usernames and entry ids only, never secrets.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::{Result, VaultError};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub username: String,
    pub entry_id: Option<u64>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(dir);
        let conn = Connection::open(&db_path).ok()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                username    TEXT NOT NULL,
                entry_id    INTEGER,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget — errors are silently ignored.
    pub fn log(&self, operation: &str, username: &str, entry_id: Option<u64>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        let entry_id = entry_id.and_then(|id| i64::try_from(id).ok());
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, username, entry_id, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, username, entry_id, details],
        );
    }

    /// Query recent audit entries, most recent first.
    ///
    /// - `limit`: maximum number of entries to return.
    /// - `since`: if provided, only return entries at or after this time.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        // RFC 3339 strings from `to_rfc3339` sort chronologically.
        let since_str = since.map_or_else(String::new, |ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, username, entry_id, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| VaultError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_str, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));
                let entry_id: Option<i64> = row.get(4)?;

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    username: row.get(3)?,
                    entry_id: entry_id.and_then(|id| u64::try_from(id).ok()),
                    details: row.get(5)?,
                })
            })
            .map_err(|e| VaultError::AuditError(format!("query exec: {e}")))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| VaultError::AuditError(format!("row parse: {e}")))
    }

    /// Return the path to the audit database.
    pub fn db_path(dir: &Path) -> PathBuf {
        dir.join("audit.db")
    }
}

/// Log an audit event next to the store file at `data_path`.
///
/// Opens the audit database, logs the event, and silently ignores any
/// errors.  Never fails the parent operation.
pub fn log_audit(
    data_path: &Path,
    op: &str,
    username: &str,
    entry_id: Option<u64>,
    details: Option<&str>,
) {
    let dir = match data_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if let Some(audit) = AuditLog::open(dir) {
        audit.log(op, username, entry_id, details);
    }
}
