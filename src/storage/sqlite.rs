//! SQLite persistence gateway.
//!
//! Owns the single database connection and the transaction protocol
//! every entity store goes through. There is no global handle: a
//! [`Database`] is constructed explicitly and passed to each store
//! call, so tests run against isolated in-memory instances.

use crate::error::Result;
use crate::model::NotificationKind;
use crate::storage::events::{insert_alert, insert_field_change, MutationContext};
use crate::storage::schema::apply_schema;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::time::Duration;

/// SQLite-backed persistence gateway.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path.
    ///
    /// Creates the file and applies the schema if it doesn't exist;
    /// re-applying on an existing database is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or
    /// the schema fails to apply.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or
    /// the schema fails to apply.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;

        if let Some(timeout) = timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        } else {
            // Default 5 second timeout
            conn.busy_timeout(Duration::from_secs(5))?;
        }

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for reads).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute a mutation with the transaction protocol.
    ///
    /// 1. Begins an IMMEDIATE transaction (write lock up front)
    /// 2. Executes the mutation closure
    /// 3. Drains the outbox: history rows, then notifications
    /// 4. Commits
    /// 5. Checkpoints the WAL into the main database file
    ///
    /// On any error before commit the transaction is rolled back
    /// (dropped) and persisted state is unchanged; callers must not
    /// patch their caches unless this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the first error from the closure, the outbox drain,
    /// the commit, or the checkpoint.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let mut ctx = MutationContext::new(op);

        let result = f(&tx, &mut ctx)?;

        // One timestamp for every side effect of this mutation
        let now = crate::model::now_iso();
        for change in &ctx.changes {
            insert_field_change(&tx, change, &now)?;
        }
        for alert in &ctx.alerts {
            insert_alert(&tx, alert, &now)?;
        }

        tx.commit()?;
        self.checkpoint()?;

        tracing::debug!(
            op,
            history = ctx.changes.len(),
            alerts = ctx.alerts.len(),
            "mutation committed"
        );

        Ok(result)
    }

    /// Flush the WAL into the main database file.
    ///
    /// Runs after every mutating transaction so the main file on disk
    /// is always current. Cost is proportional to the write, not to
    /// the database size.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkpoint pragma fails.
    pub fn checkpoint(&self) -> Result<()> {
        // wal_checkpoint returns a result row; query_row drains it
        self.conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }

    /// Export a full database image to `path` via the backup API.
    ///
    /// Overwrites any previous snapshot at that path.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be opened or the
    /// backup fails.
    pub fn snapshot_to(&self, path: &Path) -> Result<()> {
        let mut dst = Connection::open(path)?;
        let backup = rusqlite::backup::Backup::new(&self.conn, &mut dst)?;
        backup.run_to_completion(64, Duration::from_millis(10), None)?;
        Ok(())
    }

    /// Persist a standalone notification outside any store mutation.
    ///
    /// Used at the store boundary to surface validation and not-found
    /// failures as error notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn notify(&mut self, title: &str, message: &str, kind: NotificationKind) -> Result<()> {
        self.mutate("notify", |_tx, ctx| {
            ctx.alert(title, message, kind);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn row_count(db: &Database, table: &str) -> i64 {
        db.conn()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_mutate_commits_and_drains_outbox() {
        let mut db = Database::open_memory().unwrap();

        db.mutate("test_insert", |tx, ctx| {
            tx.execute(
                "INSERT INTO avvs (id, client_name, project_name, budget, deadline, needs, technologies, status, created_at, updated_at)
                 VALUES ('a1', 'Acme', 'Portal', 5000, '2025-01-01', '', '[]', 'reception', '2024-01-01T00:00:00.000Z', '2024-01-01T00:00:00.000Z')",
                [],
            )?;
            ctx.record_change("a1", "status", "", "reception");
            ctx.alert("Created", "msg", NotificationKind::Info);
            Ok(())
        })
        .unwrap();

        assert_eq!(row_count(&db, "avvs"), 1);
        assert_eq!(row_count(&db, "avv_history"), 1);
        assert_eq!(row_count(&db, "notifications"), 1);
    }

    #[test]
    fn test_mutate_rolls_back_on_error() {
        let mut db = Database::open_memory().unwrap();

        let result: Result<()> = db.mutate("test_failure", |tx, ctx| {
            tx.execute(
                "INSERT INTO avvs (id, client_name, project_name, budget, deadline, needs, technologies, status, created_at, updated_at)
                 VALUES ('a1', 'Acme', 'Portal', 5000, '2025-01-01', '', '[]', 'reception', '2024-01-01T00:00:00.000Z', '2024-01-01T00:00:00.000Z')",
                [],
            )?;
            ctx.alert("never persisted", "msg", NotificationKind::Info);
            Err(Error::InvalidArgument("boom".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(row_count(&db, "avvs"), 0);
        assert_eq!(row_count(&db, "notifications"), 0);
    }

    #[test]
    fn test_consecutive_failed_writes_leave_state_unchanged() {
        let mut db = Database::open_memory().unwrap();

        db.mutate("seed", |tx, _ctx| {
            tx.execute(
                "INSERT INTO avvs (id, client_name, project_name, budget, deadline, needs, technologies, status, created_at, updated_at)
                 VALUES ('a1', 'Acme', 'Portal', 5000, '2025-01-01', '', '[]', 'reception', '2024-01-01T00:00:00.000Z', '2024-01-01T00:00:00.000Z')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        for _ in 0..2 {
            let result: Result<()> = db.mutate("failing", |tx, _ctx| {
                tx.execute("UPDATE avvs SET budget = 9999 WHERE id = 'a1'", [])?;
                Err(Error::InvalidArgument("boom".to_string()))
            });
            assert!(result.is_err());
        }

        let budget: f64 = db
            .conn()
            .query_row("SELECT budget FROM avvs WHERE id = 'a1'", [], |r| r.get(0))
            .unwrap();
        assert!((budget - 5000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut db = Database::open(&dir.path().join("avv.db")).unwrap();

        db.mutate("seed", |tx, _ctx| {
            tx.execute(
                "INSERT INTO notifications (id, title, message, kind, read, created_at)
                 VALUES ('n1', 't', 'm', 'info', 0, '2024-01-01T00:00:00.000Z')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let snapshot = dir.path().join("avv.snapshot");
        db.snapshot_to(&snapshot).unwrap();

        let copy = Database::open(&snapshot).unwrap();
        assert_eq!(row_count(&copy, "notifications"), 1);
    }
}
