//! Database schema definitions.
//!
//! The complete SQLite schema for the AVV tracker. Applied on every
//! open; idempotent because all statements use `IF NOT EXISTS`.

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the AVV database.
///
/// Timestamps are TEXT (RFC 3339, UTC); descending lexicographic
/// order equals descending chronological order, so `ORDER BY
/// created_at DESC` needs no parsing.
///
/// `avv_history` and `attachments` carry no foreign key: rows are
/// retained after the parent opportunity is deleted.
pub const SCHEMA_SQL: &str = r#"
-- ====================
-- Schema Version Tracking
-- ====================

CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TEXT NOT NULL
);

-- ====================
-- Core Tables
-- ====================

-- Opportunities: the AVV records moving through the pipeline
CREATE TABLE IF NOT EXISTS avvs (
    id TEXT PRIMARY KEY,
    client_name TEXT NOT NULL,
    project_name TEXT NOT NULL,
    budget REAL NOT NULL CHECK (budget >= 0),
    deadline TEXT NOT NULL,
    needs TEXT NOT NULL,
    technologies TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_avvs_status ON avvs(status);
CREATE INDEX IF NOT EXISTS idx_avvs_created ON avvs(created_at DESC);

-- Comments: free text attached to one opportunity
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    avv_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (avv_id) REFERENCES avvs(id)
);

CREATE INDEX IF NOT EXISTS idx_comments_avv ON comments(avv_id);
CREATE INDEX IF NOT EXISTS idx_comments_created ON comments(created_at DESC);

-- Attachments: inline base64 content; no FK, rows outlive the parent
CREATE TABLE IF NOT EXISTS attachments (
    id TEXT PRIMARY KEY,
    avv_id TEXT NOT NULL,
    name TEXT NOT NULL,
    mime_type TEXT NOT NULL,
    size INTEGER NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_attachments_avv ON attachments(avv_id);

-- History: append-only field-level audit; no FK, rows outlive the parent
CREATE TABLE IF NOT EXISTS avv_history (
    id TEXT PRIMARY KEY,
    avv_id TEXT NOT NULL,
    field TEXT NOT NULL,
    old_value TEXT NOT NULL,
    new_value TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_avv ON avv_history(avv_id);
CREATE INDEX IF NOT EXISTS idx_history_created ON avv_history(created_at DESC);

-- Notifications: unread queue; read flag stored as 0/1
CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    message TEXT NOT NULL,
    kind TEXT NOT NULL,
    read INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notifications_read ON notifications(read);
CREATE INDEX IF NOT EXISTS idx_notifications_created ON notifications(created_at DESC);
"#;

/// Apply the schema to the database.
///
/// This uses `execute_batch` to run the entire DDL script.
/// It is idempotent because all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // Set pragmas before schema creation
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    conn.execute_batch(SCHEMA_SQL)?;

    // Record schema version
    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            crate::model::now_iso()
        ],
    )?;

    Ok(())
}
