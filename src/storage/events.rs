//! Mutation outbox: side effects recorded during a transaction.
//!
//! Stores never write into each other's tables. A mutation closure
//! records field changes and alerts on the [`MutationContext`]; the
//! gateway drains them into `avv_history` and `notifications` inside
//! the same transaction, just before commit.

use crate::model::{self, NotificationKind};
use rusqlite::{Connection, Result};

/// One field-level change destined for the history table.
#[derive(Debug, Clone)]
pub struct FieldChange {
    /// Opportunity the change applies to.
    pub avv_id: String,
    /// Changed field name ("status", "budget", "comment", ...).
    pub field: String,
    /// Previous value as a display string.
    pub old_value: String,
    /// New value as a display string.
    pub new_value: String,
}

/// One user-facing notification destined for the notifications table.
#[derive(Debug, Clone)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

/// Context for a mutation operation, tracking side effects.
///
/// Passed to mutation closures so a single transaction can carry the
/// row write, its history entries, and its notifications without the
/// calling store reaching into the other stores.
pub struct MutationContext {
    /// Name of the operation being performed.
    pub op_name: String,
    /// History rows to write at the end of the transaction.
    pub changes: Vec<FieldChange>,
    /// Notifications to write at the end of the transaction.
    pub alerts: Vec<Alert>,
}

impl MutationContext {
    /// Create a new mutation context.
    #[must_use]
    pub fn new(op_name: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            changes: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Record a field change for the history table.
    pub fn record_change(&mut self, avv_id: &str, field: &str, old_value: &str, new_value: &str) {
        self.changes.push(FieldChange {
            avv_id: avv_id.to_string(),
            field: field.to_string(),
            old_value: old_value.to_string(),
            new_value: new_value.to_string(),
        });
    }

    /// Record a user-facing notification.
    pub fn alert(&mut self, title: &str, message: &str, kind: NotificationKind) {
        self.alerts.push(Alert {
            title: title.to_string(),
            message: message.to_string(),
            kind,
        });
    }
}

/// Insert a history row for a field change.
///
/// Generates the id and timestamp; history is append-only so there
/// is no update counterpart.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_field_change(conn: &Connection, change: &FieldChange, now: &str) -> Result<String> {
    let id = model::new_id("hist");
    conn.execute(
        "INSERT INTO avv_history (id, avv_id, field, old_value, new_value, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            id,
            change.avv_id,
            change.field,
            change.old_value,
            change.new_value,
            now,
        ],
    )?;
    Ok(id)
}

/// Insert a notification row for an alert, unread.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_alert(conn: &Connection, alert: &Alert, now: &str) -> Result<String> {
    let id = model::new_id("ntf");
    conn.execute(
        "INSERT INTO notifications (id, title, message, kind, read, created_at)
         VALUES (?1, ?2, ?3, ?4, 0, ?5)",
        rusqlite::params![id, alert.title, alert.message, alert.kind.as_str(), now],
    )?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::apply_schema;

    #[test]
    fn test_insert_field_change_and_alert() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let change = FieldChange {
            avv_id: "avv_test".to_string(),
            field: "status".to_string(),
            old_value: "reception".to_string(),
            new_value: "analyse".to_string(),
        };
        let id = insert_field_change(&conn, &change, "2024-01-01T00:00:00.000Z").unwrap();
        assert!(id.starts_with("hist_"));

        let alert = Alert {
            title: "Status updated".to_string(),
            message: "Moved to analyse".to_string(),
            kind: NotificationKind::Info,
        };
        let id = insert_alert(&conn, &alert, "2024-01-01T00:00:00.000Z").unwrap();
        assert!(id.starts_with("ntf_"));

        let unread: i64 = conn
            .query_row("SELECT COUNT(*) FROM notifications WHERE read = 0", [], |r| r.get(0))
            .unwrap();
        assert_eq!(unread, 1);
    }

    #[test]
    fn test_context_accumulates() {
        let mut ctx = MutationContext::new("update_opportunity");
        ctx.record_change("avv_1", "budget", "1000", "2000");
        ctx.record_change("avv_1", "needs", "a", "b");
        ctx.alert("Updated", "msg", NotificationKind::Info);

        assert_eq!(ctx.op_name, "update_opportunity");
        assert_eq!(ctx.changes.len(), 2);
        assert_eq!(ctx.alerts.len(), 1);
    }
}
