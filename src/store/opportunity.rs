//! Opportunity store.
//!
//! Owns the cache of AVV records and the mutation protocol for them.
//! Updates diff old against new values as display strings, recording
//! one history row per field that actually changed; every successful
//! mutation also queues a notification. Validation and not-found
//! failures are kept on the store as `last_error` and surfaced as a
//! persisted error notification.
//!
//! Deletion is not status-guarded here: the CLI layer refuses to
//! delete records in validation or a closed state, the store obeys
//! any caller.

use crate::error::{Error, Result};
use crate::model::{
    self, NotificationKind, Opportunity, OpportunityDraft, OpportunityPatch, Status,
};
use crate::storage::{codec, Database};
use crate::validate;

const SELECT_COLUMNS: &str =
    "id, client_name, project_name, budget, deadline, needs, technologies, status, created_at, updated_at";

/// In-memory cache and operations for opportunities.
#[derive(Debug, Default)]
pub struct OpportunityStore {
    opportunities: Vec<Opportunity>,
    /// Message of the last failed operation, cleared on success.
    pub last_error: Option<String>,
}

impl OpportunityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached records, newest first.
    #[must_use]
    pub fn all(&self) -> &[Opportunity] {
        &self.opportunities
    }

    /// Look up a cached record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Opportunity> {
        self.opportunities.iter().find(|o| o.id == id)
    }

    /// Load all opportunities, newest first, replacing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub fn fetch(&mut self, db: &Database) -> Result<&[Opportunity]> {
        let mut stmt = db.conn().prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM avvs ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], codec::opportunity_from_row)?;
        self.opportunities = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(&self.opportunities)
    }

    /// Create a new opportunity.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty names, a negative budget
    /// or a malformed deadline; the failure is also stored as
    /// `last_error` and queued as an error notification.
    pub fn add(&mut self, db: &mut Database, draft: OpportunityDraft) -> Result<Opportunity> {
        match self.try_add(db, draft) {
            Ok(record) => {
                self.last_error = None;
                Ok(record)
            }
            Err(e) => self.fail(db, "Creation failed", e),
        }
    }

    fn try_add(&mut self, db: &mut Database, draft: OpportunityDraft) -> Result<Opportunity> {
        validate::validate_draft(&draft)?;

        let now = model::now_iso();
        let record = Opportunity {
            id: model::new_id("avv"),
            client_name: draft.client_name,
            project_name: draft.project_name,
            budget: draft.budget,
            deadline: draft.deadline,
            needs: draft.needs,
            technologies: draft.technologies,
            status: draft.status,
            created_at: now.clone(),
            updated_at: now,
        };

        db.mutate("add_opportunity", |tx, ctx| {
            tx.execute(
                &format!("INSERT INTO avvs ({SELECT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
                rusqlite::params![
                    record.id,
                    record.client_name,
                    record.project_name,
                    record.budget,
                    record.deadline,
                    record.needs,
                    codec::encode_technologies(&record.technologies),
                    record.status.as_str(),
                    record.created_at,
                    record.updated_at,
                ],
            )?;

            ctx.alert(
                "Opportunity created",
                &format!(
                    "Opportunity \"{}\" for {} was created.",
                    record.project_name, record.client_name
                ),
                NotificationKind::Info,
            );
            Ok(())
        })?;

        self.opportunities.insert(0, record.clone());
        Ok(record)
    }

    /// Update tracked fields of an opportunity.
    ///
    /// Each tracked field whose display value actually changed gets
    /// exactly one history row; an identical-values update writes
    /// none. `updated_at` is bumped either way.
    ///
    /// # Errors
    ///
    /// Returns not-found if the id is absent from the cache, or a
    /// validation error for invalid patch values.
    pub fn update(
        &mut self,
        db: &mut Database,
        id: &str,
        patch: OpportunityPatch,
    ) -> Result<Opportunity> {
        match self.try_update(db, id, patch) {
            Ok(record) => {
                self.last_error = None;
                Ok(record)
            }
            Err(e) => self.fail(db, "Update failed", e),
        }
    }

    fn try_update(
        &mut self,
        db: &mut Database,
        id: &str,
        patch: OpportunityPatch,
    ) -> Result<Opportunity> {
        let current = self.get(id).cloned().ok_or_else(|| self.not_found(id))?;

        if let Some(client) = &patch.client_name {
            validate::require_non_empty("client name", client)?;
        }
        if let Some(project) = &patch.project_name {
            validate::require_non_empty("project name", project)?;
        }
        if let Some(budget) = patch.budget {
            validate::validate_budget(budget)?;
        }
        if let Some(deadline) = &patch.deadline {
            validate::validate_deadline(deadline)?;
        }

        let mut updated = current.clone();
        if let Some(v) = patch.client_name {
            updated.client_name = v;
        }
        if let Some(v) = patch.project_name {
            updated.project_name = v;
        }
        if let Some(v) = patch.budget {
            updated.budget = v;
        }
        if let Some(v) = patch.deadline {
            updated.deadline = v;
        }
        if let Some(v) = patch.needs {
            updated.needs = v;
        }
        if let Some(v) = patch.technologies {
            updated.technologies = v;
        }
        if let Some(v) = patch.status {
            updated.status = v;
        }
        updated.updated_at = model::now_iso();

        let changes = diff_tracked_fields(&current, &updated);

        db.mutate("update_opportunity", |tx, ctx| {
            let rows = tx.execute(
                "UPDATE avvs
                 SET client_name = ?1,
                     project_name = ?2,
                     budget = ?3,
                     deadline = ?4,
                     needs = ?5,
                     technologies = ?6,
                     status = ?7,
                     updated_at = ?8
                 WHERE id = ?9",
                rusqlite::params![
                    updated.client_name,
                    updated.project_name,
                    updated.budget,
                    updated.deadline,
                    updated.needs,
                    codec::encode_technologies(&updated.technologies),
                    updated.status.as_str(),
                    updated.updated_at,
                    updated.id,
                ],
            )?;

            if rows == 0 {
                return Err(Error::OpportunityNotFound { id: id.to_string() });
            }

            for (field, old_value, new_value) in &changes {
                ctx.record_change(&updated.id, field, old_value, new_value);
            }

            ctx.alert(
                "Opportunity updated",
                &format!("Opportunity \"{}\" was updated.", updated.project_name),
                NotificationKind::Info,
            );
            Ok(())
        })?;

        if let Some(slot) = self.opportunities.iter_mut().find(|o| o.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Move an opportunity to another pipeline status.
    ///
    /// Records a single `status` history row when the status actually
    /// changes, and queues a notification naming the new status.
    ///
    /// # Errors
    ///
    /// Returns not-found if the id is absent from the cache.
    pub fn update_status(
        &mut self,
        db: &mut Database,
        id: &str,
        status: Status,
    ) -> Result<Opportunity> {
        match self.try_update_status(db, id, status) {
            Ok(record) => {
                self.last_error = None;
                Ok(record)
            }
            Err(e) => self.fail(db, "Status update failed", e),
        }
    }

    fn try_update_status(
        &mut self,
        db: &mut Database,
        id: &str,
        status: Status,
    ) -> Result<Opportunity> {
        let current = self.get(id).cloned().ok_or_else(|| self.not_found(id))?;
        let now = model::now_iso();

        db.mutate("update_status", |tx, ctx| {
            let rows = tx.execute(
                "UPDATE avvs SET status = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![status.as_str(), now, id],
            )?;

            if rows == 0 {
                return Err(Error::OpportunityNotFound { id: id.to_string() });
            }

            if current.status != status {
                ctx.record_change(id, "status", current.status.as_str(), status.as_str());
            }

            ctx.alert(
                "Status updated",
                &format!("Opportunity moved to \"{status}\"."),
                NotificationKind::Info,
            );
            Ok(())
        })?;

        let mut updated = current;
        updated.status = status;
        updated.updated_at = now;
        if let Some(slot) = self.opportunities.iter_mut().find(|o| o.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete an opportunity and its comments.
    ///
    /// History and attachment rows are retained; only comments go
    /// with the record.
    ///
    /// # Errors
    ///
    /// Returns not-found if the id is absent from the cache.
    pub fn delete(&mut self, db: &mut Database, id: &str) -> Result<()> {
        match self.try_delete(db, id) {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(e) => self.fail(db, "Deletion failed", e),
        }
    }

    fn try_delete(&mut self, db: &mut Database, id: &str) -> Result<()> {
        let current = self.get(id).cloned().ok_or_else(|| self.not_found(id))?;

        db.mutate("delete_opportunity", |tx, ctx| {
            tx.execute("DELETE FROM comments WHERE avv_id = ?1", [id])?;
            let rows = tx.execute("DELETE FROM avvs WHERE id = ?1", [id])?;

            if rows == 0 {
                return Err(Error::OpportunityNotFound { id: id.to_string() });
            }

            ctx.alert(
                "Opportunity deleted",
                &format!("Opportunity \"{}\" was deleted.", current.project_name),
                NotificationKind::Info,
            );
            Ok(())
        })?;

        self.opportunities.retain(|o| o.id != id);
        Ok(())
    }

    /// Not-found error with close-match suggestions from the cache.
    fn not_found(&self, id: &str) -> Error {
        let ids: Vec<String> = self.opportunities.iter().map(|o| o.id.clone()).collect();
        let similar = validate::find_similar_ids(id, &ids, 3);
        if similar.is_empty() {
            Error::OpportunityNotFound { id: id.to_string() }
        } else {
            Error::OpportunityNotFoundSimilar {
                id: id.to_string(),
                similar,
            }
        }
    }

    /// Store-boundary failure handling: remember the message and
    /// queue an error notification, then propagate.
    fn fail<T>(&mut self, db: &mut Database, title: &str, e: Error) -> Result<T> {
        self.last_error = Some(e.to_string());
        // The original error wins even if the notification write fails
        let _ = db.notify(title, &e.to_string(), NotificationKind::Error);
        Err(e)
    }
}

/// Compare two records field by field as display strings.
///
/// Returns `(field, old, new)` for each tracked field that differs;
/// technologies compare as their comma-joined form.
fn diff_tracked_fields(
    old: &Opportunity,
    new: &Opportunity,
) -> Vec<(&'static str, String, String)> {
    let mut changes = Vec::new();

    let pairs: [(&'static str, String, String); 7] = [
        ("client_name", old.client_name.clone(), new.client_name.clone()),
        ("project_name", old.project_name.clone(), new.project_name.clone()),
        ("budget", old.budget_display(), new.budget_display()),
        ("deadline", old.deadline.clone(), new.deadline.clone()),
        ("needs", old.needs.clone(), new.needs.clone()),
        (
            "technologies",
            old.technologies_display(),
            new.technologies_display(),
        ),
        (
            "status",
            old.status.as_str().to_string(),
            new.status.as_str().to_string(),
        ),
    ];

    for (field, old_value, new_value) in pairs {
        if old_value != new_value {
            changes.push((field, old_value, new_value));
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HistoryEntry;
    use crate::storage::codec::history_from_row;

    fn draft() -> OpportunityDraft {
        OpportunityDraft {
            client_name: "Acme".to_string(),
            project_name: "Portal".to_string(),
            budget: 5000.0,
            deadline: "2025-01-01".to_string(),
            needs: "CRM integration".to_string(),
            technologies: vec!["React".to_string(), "Node".to_string()],
            status: Status::Reception,
        }
    }

    fn history_for(db: &Database, avv_id: &str) -> Vec<HistoryEntry> {
        let mut stmt = db
            .conn()
            .prepare(
                "SELECT id, avv_id, field, old_value, new_value, created_at
                 FROM avv_history WHERE avv_id = ?1 ORDER BY created_at DESC",
            )
            .unwrap();
        let rows = stmt.query_map([avv_id], history_from_row).unwrap();
        rows.collect::<rusqlite::Result<Vec<_>>>().unwrap()
    }

    fn unread_titles(db: &Database) -> Vec<String> {
        let mut stmt = db
            .conn()
            .prepare("SELECT title FROM notifications WHERE read = 0 ORDER BY created_at DESC")
            .unwrap();
        let rows = stmt.query_map([], |r| r.get::<_, String>(0)).unwrap();
        rows.collect::<rusqlite::Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_add_then_fetch_round_trips() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();

        let added = store.add(&mut db, draft()).unwrap();
        assert!(added.id.starts_with("avv_"));
        assert_eq!(added.created_at, added.updated_at);

        let mut fresh = OpportunityStore::new();
        let fetched = fresh.fetch(&db).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0], added);
        assert_eq!(fetched[0].status, Status::Reception);
        assert_eq!(fetched[0].technologies, vec!["React", "Node"]);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();

        let mut bad = draft();
        bad.client_name = String::new();
        let err = store.add(&mut db, bad).unwrap_err();
        assert!(matches!(err, Error::RequiredField("client name")));

        let mut bad = draft();
        bad.budget = -100.0;
        assert!(store.add(&mut db, bad).is_err());

        // Nothing persisted, cache empty, failure surfaced
        assert!(store.all().is_empty());
        assert!(store.last_error.is_some());
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM avvs", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(unread_titles(&db).contains(&"Creation failed".to_string()));
    }

    #[test]
    fn test_update_records_one_history_row_per_changed_field() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();
        let added = store.add(&mut db, draft()).unwrap();

        let patch = OpportunityPatch {
            budget: Some(7500.0),
            needs: Some("CRM + billing".to_string()),
            // Same value: must not produce a history row
            client_name: Some("Acme".to_string()),
            ..OpportunityPatch::default()
        };
        store.update(&mut db, &added.id, patch).unwrap();

        let history = history_for(&db, &added.id);
        assert_eq!(history.len(), 2);

        let budget_row = history.iter().find(|h| h.field == "budget").unwrap();
        assert_eq!(budget_row.old_value, "5000");
        assert_eq!(budget_row.new_value, "7500");

        let needs_row = history.iter().find(|h| h.field == "needs").unwrap();
        assert_eq!(needs_row.old_value, "CRM integration");
        assert_eq!(needs_row.new_value, "CRM + billing");
    }

    #[test]
    fn test_identical_update_writes_no_history() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();
        let added = store.add(&mut db, draft()).unwrap();

        let patch = OpportunityPatch {
            client_name: Some("Acme".to_string()),
            budget: Some(5000.0),
            technologies: Some(vec!["React".to_string(), "Node".to_string()]),
            ..OpportunityPatch::default()
        };
        store.update(&mut db, &added.id, patch).unwrap();

        assert!(history_for(&db, &added.id).is_empty());
    }

    #[test]
    fn test_technologies_change_is_tracked_joined() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();
        let added = store.add(&mut db, draft()).unwrap();

        let patch = OpportunityPatch {
            technologies: Some(vec!["React".to_string()]),
            ..OpportunityPatch::default()
        };
        store.update(&mut db, &added.id, patch).unwrap();

        let history = history_for(&db, &added.id);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].field, "technologies");
        assert_eq!(history[0].old_value, "React,Node");
        assert_eq!(history[0].new_value, "React");
    }

    #[test]
    fn test_update_status_records_transition_and_notifies() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();
        let added = store.add(&mut db, draft()).unwrap();

        store
            .update_status(&mut db, &added.id, Status::Validation)
            .unwrap();
        let updated = store
            .update_status(&mut db, &added.id, Status::CloturePerdu)
            .unwrap();
        assert_eq!(updated.status, Status::CloturePerdu);

        let history = history_for(&db, &added.id);
        assert_eq!(history.len(), 2);
        let last = history
            .iter()
            .find(|h| h.new_value == "cloture_perdu")
            .unwrap();
        assert_eq!(last.field, "status");
        assert_eq!(last.old_value, "validation");

        assert!(unread_titles(&db).contains(&"Status updated".to_string()));
        assert_eq!(store.get(&added.id).unwrap().status, Status::CloturePerdu);
    }

    #[test]
    fn test_same_status_move_writes_no_history() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();
        let added = store.add(&mut db, draft()).unwrap();

        store
            .update_status(&mut db, &added.id, Status::Reception)
            .unwrap();
        assert!(history_for(&db, &added.id).is_empty());
    }

    #[test]
    fn test_delete_removes_comments_but_not_history_or_attachments() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();
        let added = store.add(&mut db, draft()).unwrap();

        // One tracked change, one comment, one attachment
        store
            .update_status(&mut db, &added.id, Status::Analyse)
            .unwrap();
        let mut comments = crate::store::CommentStore::new();
        comments.add(&mut db, &added.id, "call scheduled").unwrap();
        let mut attachments = crate::store::AttachmentStore::new();
        attachments
            .add(&mut db, &added.id, "brief.pdf", "application/pdf", b"pdf")
            .unwrap();

        store.delete(&mut db, &added.id).unwrap();
        assert!(store.get(&added.id).is_none());

        let mut fresh = OpportunityStore::new();
        assert!(fresh.fetch(&db).unwrap().is_empty());

        let count = |table: &str| -> i64 {
            db.conn()
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
                .unwrap()
        };
        assert_eq!(count("comments"), 0);
        // Current behavior: history and attachments are retained
        assert!(count("avv_history") >= 2);
        assert_eq!(count("attachments"), 1);
    }

    #[test]
    fn test_delete_unknown_id_is_not_found() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();
        store.add(&mut db, draft()).unwrap();

        let err = store.delete(&mut db, "avv_missing").unwrap_err();
        assert!(matches!(
            err,
            Error::OpportunityNotFound { .. } | Error::OpportunityNotFoundSimilar { .. }
        ));
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_failed_updates_leave_cache_and_database_unchanged() {
        let mut db = Database::open_memory().unwrap();
        let mut store = OpportunityStore::new();
        let added = store.add(&mut db, draft()).unwrap();

        // Pull the row out from under the cache so the UPDATE inside
        // the transaction touches zero rows and fails.
        db.conn()
            .execute("DELETE FROM avvs WHERE id = ?1", [added.id.as_str()])
            .unwrap();

        for _ in 0..2 {
            let patch = OpportunityPatch {
                budget: Some(9999.0),
                ..OpportunityPatch::default()
            };
            let err = store.update(&mut db, &added.id, patch).unwrap_err();
            assert!(matches!(err, Error::OpportunityNotFound { .. }));
        }

        // Cache still holds the pre-failure record, no history written
        assert_eq!(store.get(&added.id).unwrap().budget, 5000.0);
        assert!(history_for(&db, &added.id).is_empty());
    }
}
