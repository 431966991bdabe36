//! History store: read side of the append-only change log.
//!
//! History rows are written exclusively through the mutation outbox
//! (see [`crate::storage::events`]); this store only fetches them.

use crate::error::Result;
use crate::model::HistoryEntry;
use crate::storage::{codec, Database};

/// In-memory cache of one opportunity's change history.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entries, newest first.
    #[must_use]
    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Load the history of one opportunity, newest first, replacing
    /// the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_for(
        &mut self,
        db: &Database,
        avv_id: &str,
        limit: Option<u32>,
    ) -> Result<&[HistoryEntry]> {
        let limit = limit.unwrap_or(100);
        let mut stmt = db.conn().prepare(
            "SELECT id, avv_id, field, old_value, new_value, created_at
             FROM avv_history WHERE avv_id = ?1
             ORDER BY created_at DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(rusqlite::params![avv_id, limit], codec::history_from_row)?;
        self.entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_is_filtered_and_newest_first() {
        let mut db = Database::open_memory().unwrap();

        db.mutate("seed", |tx, _ctx| {
            for (id, avv_id, ts) in [
                ("h1", "avv_a", "2024-01-01T00:00:00.000Z"),
                ("h2", "avv_a", "2024-01-03T00:00:00.000Z"),
                ("h3", "avv_b", "2024-01-02T00:00:00.000Z"),
            ] {
                tx.execute(
                    "INSERT INTO avv_history (id, avv_id, field, old_value, new_value, created_at)
                     VALUES (?1, ?2, 'status', 'a', 'b', ?3)",
                    rusqlite::params![id, avv_id, ts],
                )?;
            }
            Ok(())
        })
        .unwrap();

        let mut store = HistoryStore::new();
        let entries = store.fetch_for(&db, "avv_a", None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "h2");
        assert_eq!(entries[1].id, "h1");
    }

    #[test]
    fn test_outbox_writes_are_visible() {
        let mut db = Database::open_memory().unwrap();

        db.mutate("change", |_tx, ctx| {
            ctx.record_change("avv_a", "budget", "1000", "2000");
            Ok(())
        })
        .unwrap();

        let mut store = HistoryStore::new();
        let entries = store.fetch_for(&db, "avv_a", None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field, "budget");
        assert_eq!(entries[0].old_value, "1000");
        assert_eq!(entries[0].new_value, "2000");
    }
}
