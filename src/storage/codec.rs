//! Row codec: mapping between domain records and SQLite rows.
//!
//! Pure, stateless functions. List-valued fields are stored as JSON
//! text; booleans as 0/1 integers. No validation happens here —
//! malformed stored data surfaces as a decode failure to the caller.

use crate::model::{Attachment, Comment, HistoryEntry, Notification, NotificationKind, Opportunity, Status};
use rusqlite::Row;
use rusqlite::types::Type;

/// Encode a technologies list as JSON text.
///
/// Serializing a `Vec<String>` cannot fail.
#[must_use]
pub fn encode_technologies(technologies: &[String]) -> String {
    serde_json::to_string(technologies).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a technologies JSON column back into an ordered list.
pub fn decode_technologies(raw: &str) -> serde_json::Result<Vec<String>> {
    serde_json::from_str(raw)
}

/// Encode a boolean as a 0/1 integer column value.
#[must_use]
pub const fn encode_bool(value: bool) -> i64 {
    if value { 1 } else { 0 }
}

/// Decode a 0/1 integer column value as a boolean.
#[must_use]
pub const fn decode_bool(value: i64) -> bool {
    value != 0
}

/// Decode failure helper: wrap a message into the rusqlite error type
/// so codec errors propagate through `query_map` like any other row
/// error.
fn decode_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

/// Map a row of `SELECT id, client_name, project_name, budget,
/// deadline, needs, technologies, status, created_at, updated_at
/// FROM avvs` into an [`Opportunity`].
pub fn opportunity_from_row(row: &Row) -> rusqlite::Result<Opportunity> {
    let technologies_raw: String = row.get(6)?;
    let technologies = decode_technologies(&technologies_raw)
        .map_err(|e| decode_error(6, format!("invalid technologies JSON: {e}")))?;

    let status_raw: String = row.get(7)?;
    let status = Status::parse(&status_raw)
        .ok_or_else(|| decode_error(7, format!("unknown status '{status_raw}'")))?;

    Ok(Opportunity {
        id: row.get(0)?,
        client_name: row.get(1)?,
        project_name: row.get(2)?,
        budget: row.get(3)?,
        deadline: row.get(4)?,
        needs: row.get(5)?,
        technologies,
        status,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Map a row of `SELECT id, avv_id, content, created_at, updated_at
/// FROM comments` into a [`Comment`].
pub fn comment_from_row(row: &Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        avv_id: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Map a row of `SELECT id, avv_id, name, mime_type, size, data,
/// created_at, updated_at FROM attachments` into an [`Attachment`].
pub fn attachment_from_row(row: &Row) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get(0)?,
        avv_id: row.get(1)?,
        name: row.get(2)?,
        mime_type: row.get(3)?,
        size: row.get(4)?,
        data: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Map a row of `SELECT id, avv_id, field, old_value, new_value,
/// created_at FROM avv_history` into a [`HistoryEntry`].
pub fn history_from_row(row: &Row) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        avv_id: row.get(1)?,
        field: row.get(2)?,
        old_value: row.get(3)?,
        new_value: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Map a row of `SELECT id, title, message, kind, read, created_at
/// FROM notifications` into a [`Notification`].
pub fn notification_from_row(row: &Row) -> rusqlite::Result<Notification> {
    let kind_raw: String = row.get(3)?;
    let kind = NotificationKind::parse(&kind_raw)
        .ok_or_else(|| decode_error(3, format!("unknown notification kind '{kind_raw}'")))?;

    Ok(Notification {
        id: row.get(0)?,
        title: row.get(1)?,
        message: row.get(2)?,
        kind,
        read: decode_bool(row.get(4)?),
        created_at: row.get(5)?,
    })
}
