//! Notification store.
//!
//! The cache holds only unread notifications; marking one as read
//! persists the flag and drops it from the cache, so read items
//! disappear from the visible list instead of re-rendering as read.

use crate::error::{Error, Result};
use crate::model::Notification;
use crate::storage::{codec, Database};

/// In-memory unread notification queue.
#[derive(Debug, Default)]
pub struct NotificationStore {
    notifications: Vec<Notification>,
}

impl NotificationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached unread notifications, newest first.
    #[must_use]
    pub fn unread(&self) -> &[Notification] {
        &self.notifications
    }

    /// Load all unread notifications, newest first, replacing the
    /// cache. Read notifications never re-surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch(&mut self, db: &Database) -> Result<&[Notification]> {
        let mut stmt = db.conn().prepare(
            "SELECT id, title, message, kind, read, created_at
             FROM notifications WHERE read = 0 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], codec::notification_from_row)?;
        self.notifications = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(&self.notifications)
    }

    /// Mark one notification as read and drop it from the cache.
    ///
    /// # Errors
    ///
    /// Returns not-found if no unread notification has this id.
    pub fn mark_read(&mut self, db: &mut Database, id: &str) -> Result<()> {
        db.mutate("mark_notification_read", |tx, _ctx| {
            let rows = tx.execute(
                "UPDATE notifications SET read = 1 WHERE id = ?1 AND read = 0",
                [id],
            )?;
            if rows == 0 {
                return Err(Error::NotificationNotFound { id: id.to_string() });
            }
            Ok(())
        })?;

        self.notifications.retain(|n| n.id != id);
        Ok(())
    }

    /// Mark every unread notification as read and clear the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_all_read(&mut self, db: &mut Database) -> Result<usize> {
        let count = db.mutate("mark_all_notifications_read", |tx, _ctx| {
            let rows = tx.execute("UPDATE notifications SET read = 1 WHERE read = 0", [])?;
            Ok(rows)
        })?;

        self.notifications.clear();
        Ok(count)
    }

    /// Delete a notification outright.
    ///
    /// # Errors
    ///
    /// Returns not-found if no notification has this id.
    pub fn remove(&mut self, db: &mut Database, id: &str) -> Result<()> {
        db.mutate("remove_notification", |tx, _ctx| {
            let rows = tx.execute("DELETE FROM notifications WHERE id = ?1", [id])?;
            if rows == 0 {
                return Err(Error::NotificationNotFound { id: id.to_string() });
            }
            Ok(())
        })?;

        self.notifications.retain(|n| n.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationKind;

    fn seed(db: &mut Database, n: usize) {
        db.mutate("seed", |_tx, ctx| {
            for i in 0..n {
                ctx.alert(&format!("title {i}"), "message", NotificationKind::Info);
            }
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_fetch_returns_only_unread() {
        let mut db = Database::open_memory().unwrap();
        seed(&mut db, 3);

        let mut store = NotificationStore::new();
        assert_eq!(store.fetch(&db).unwrap().len(), 3);

        let id = store.unread()[0].id.clone();
        store.mark_read(&mut db, &id).unwrap();

        // Gone from the cache immediately, and from the next fetch
        assert_eq!(store.unread().len(), 2);
        let mut fresh = NotificationStore::new();
        let fetched = fresh.fetch(&db).unwrap();
        assert_eq!(fetched.len(), 2);
        assert!(fetched.iter().all(|n| n.id != id && !n.read));
    }

    #[test]
    fn test_mark_read_twice_is_not_found() {
        let mut db = Database::open_memory().unwrap();
        seed(&mut db, 1);

        let mut store = NotificationStore::new();
        store.fetch(&db).unwrap();
        let id = store.unread()[0].id.clone();

        store.mark_read(&mut db, &id).unwrap();
        assert!(matches!(
            store.mark_read(&mut db, &id),
            Err(Error::NotificationNotFound { .. })
        ));
    }

    #[test]
    fn test_mark_all_read() {
        let mut db = Database::open_memory().unwrap();
        seed(&mut db, 4);

        let mut store = NotificationStore::new();
        store.fetch(&db).unwrap();
        assert_eq!(store.mark_all_read(&mut db).unwrap(), 4);
        assert!(store.unread().is_empty());

        let mut fresh = NotificationStore::new();
        assert!(fresh.fetch(&db).unwrap().is_empty());
    }

    #[test]
    fn test_remove_deletes_row() {
        let mut db = Database::open_memory().unwrap();
        seed(&mut db, 1);

        let mut store = NotificationStore::new();
        store.fetch(&db).unwrap();
        let id = store.unread()[0].id.clone();
        store.remove(&mut db, &id).unwrap();

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM notifications", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
