//! Attachment store.
//!
//! Content is stored inline as base64 text. Add and delete are both
//! mirrored into the history table as `attachment` entries; deleted
//! attachments therefore stay visible in the change log.

use crate::error::{Error, Result};
use crate::model::{self, Attachment, NotificationKind};
use crate::storage::{codec, Database};
use crate::validate;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// In-memory cache and operations for attachments.
#[derive(Debug, Default)]
pub struct AttachmentStore {
    attachments: Vec<Attachment>,
    /// Message of the last failed operation, cleared on success.
    pub last_error: Option<String>,
}

impl AttachmentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached attachments, newest first.
    #[must_use]
    pub fn all(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Look up a cached attachment by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.id == id)
    }

    /// Load the attachments of one opportunity, newest first,
    /// replacing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_for(&mut self, db: &Database, avv_id: &str) -> Result<&[Attachment]> {
        let mut stmt = db.conn().prepare(
            "SELECT id, avv_id, name, mime_type, size, data, created_at, updated_at
             FROM attachments WHERE avv_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([avv_id], codec::attachment_from_row)?;
        self.attachments = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(&self.attachments)
    }

    /// Attach a file to an opportunity.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, not-found if the
    /// opportunity does not exist.
    pub fn add(
        &mut self,
        db: &mut Database,
        avv_id: &str,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<Attachment> {
        match self.try_add(db, avv_id, name, mime_type, bytes) {
            Ok(attachment) => {
                self.last_error = None;
                Ok(attachment)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                let _ = db.notify("Attachment failed", &e.to_string(), NotificationKind::Error);
                Err(e)
            }
        }
    }

    fn try_add(
        &mut self,
        db: &mut Database,
        avv_id: &str,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<Attachment> {
        validate::require_non_empty("file name", name)?;

        let now = model::now_iso();
        let attachment = Attachment {
            id: model::new_id("att"),
            avv_id: avv_id.to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size: i64::try_from(bytes.len()).unwrap_or(i64::MAX),
            data: BASE64.encode(bytes),
            created_at: now.clone(),
            updated_at: now,
        };

        db.mutate("add_attachment", |tx, ctx| {
            let parent_exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM avvs WHERE id = ?1)",
                [avv_id],
                |row| row.get(0),
            )?;
            if !parent_exists {
                return Err(Error::OpportunityNotFound {
                    id: avv_id.to_string(),
                });
            }

            tx.execute(
                "INSERT INTO attachments (id, avv_id, name, mime_type, size, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    attachment.id,
                    attachment.avv_id,
                    attachment.name,
                    attachment.mime_type,
                    attachment.size,
                    attachment.data,
                    attachment.created_at,
                    attachment.updated_at,
                ],
            )?;

            ctx.record_change(avv_id, "attachment", "", &format!("Added file: {name}"));
            Ok(())
        })?;

        self.attachments.insert(0, attachment.clone());
        Ok(attachment)
    }

    /// Remove an attachment.
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
            Err(e) => {
                self.last_error = Some(e.to_string());
                let _ = db.notify("Attachment removal failed", &e.to_string(), NotificationKind::Error);
                Err(e)
            }
        }
    }

    fn try_delete(&mut self, db: &mut Database, id: &str) -> Result<()> {
        let attachment = self
            .get(id)
            .cloned()
            .ok_or_else(|| Error::AttachmentNotFound { id: id.to_string() })?;

        db.mutate("delete_attachment", |tx, ctx| {
            let rows = tx.execute("DELETE FROM attachments WHERE id = ?1", [id])?;
            if rows == 0 {
                return Err(Error::AttachmentNotFound { id: id.to_string() });
            }

            ctx.record_change(
                &attachment.avv_id,
                "attachment",
                &format!("Removed file: {}", attachment.name),
                "",
            );
            Ok(())
        })?;

        self.attachments.retain(|a| a.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpportunityDraft, Status};
    use crate::store::OpportunityStore;

    fn seed_opportunity(db: &mut Database) -> String {
        let mut store = OpportunityStore::new();
        store
            .add(
                db,
                OpportunityDraft {
                    client_name: "Acme".to_string(),
                    project_name: "Portal".to_string(),
                    budget: 5000.0,
                    deadline: "2025-01-01".to_string(),
                    needs: String::new(),
                    technologies: vec![],
                    status: Status::Reception,
                },
            )
            .unwrap()
            .id
    }

    #[test]
    fn test_add_encodes_content_and_size() {
        let mut db = Database::open_memory().unwrap();
        let avv_id = seed_opportunity(&mut db);
        let mut store = AttachmentStore::new();

        let bytes = b"%PDF-1.4 fake content";
        let added = store
            .add(&mut db, &avv_id, "brief.pdf", "application/pdf", bytes)
            .unwrap();

        assert_eq!(added.size, bytes.len() as i64);
        assert_eq!(BASE64.decode(&added.data).unwrap(), bytes);

        let mut fresh = AttachmentStore::new();
        let fetched = fresh.fetch_for(&db, &avv_id).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0], added);
    }

    #[test]
    fn test_add_and_delete_write_history() {
        let mut db = Database::open_memory().unwrap();
        let avv_id = seed_opportunity(&mut db);
        let mut store = AttachmentStore::new();

        let added = store
            .add(&mut db, &avv_id, "notes.txt", "text/plain", b"hello")
            .unwrap();
        store.delete(&mut db, &added.id).unwrap();
        assert!(store.all().is_empty());

        let mut stmt = db
            .conn()
            .prepare(
                "SELECT old_value, new_value FROM avv_history
                 WHERE avv_id = ?1 AND field = 'attachment' ORDER BY created_at ASC",
            )
            .unwrap();
        let rows: Vec<(String, String)> = stmt
            .query_map([avv_id.as_str()], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], (String::new(), "Added file: notes.txt".to_string()));
        assert_eq!(rows[1], ("Removed file: notes.txt".to_string(), String::new()));
    }

    #[test]
    fn test_delete_unknown_id_is_not_found() {
        let mut db = Database::open_memory().unwrap();
        seed_opportunity(&mut db);
        let mut store = AttachmentStore::new();

        assert!(matches!(
            store.delete(&mut db, "att_missing"),
            Err(Error::AttachmentNotFound { .. })
        ));
    }
}
