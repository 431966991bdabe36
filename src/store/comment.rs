//! Comment store.

use crate::error::{Error, Result};
use crate::model::{self, Comment, NotificationKind};
use crate::storage::{codec, Database};
use crate::validate;

/// In-memory cache and operations for comments.
#[derive(Debug, Default)]
pub struct CommentStore {
    comments: Vec<Comment>,
    /// Message of the last failed operation, cleared on success.
    pub last_error: Option<String>,
}

impl CommentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached comments, newest first.
    #[must_use]
    pub fn all(&self) -> &[Comment] {
        &self.comments
    }

    /// Load the comments of one opportunity, newest first, replacing
    /// the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_for(&mut self, db: &Database, avv_id: &str) -> Result<&[Comment]> {
        let mut stmt = db.conn().prepare(
            "SELECT id, avv_id, content, created_at, updated_at
             FROM comments WHERE avv_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([avv_id], codec::comment_from_row)?;
        self.comments = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(&self.comments)
    }

    /// Add a comment to an opportunity.
    ///
    /// The comment is mirrored into the history table as a `comment`
    /// entry (empty old value, content as new value).
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty content, not-found if the
    /// opportunity does not exist.
    pub fn add(&mut self, db: &mut Database, avv_id: &str, content: &str) -> Result<Comment> {
        match self.try_add(db, avv_id, content) {
            Ok(comment) => {
                self.last_error = None;
                Ok(comment)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                let _ = db.notify("Comment failed", &e.to_string(), NotificationKind::Error);
                Err(e)
            }
        }
    }

    fn try_add(&mut self, db: &mut Database, avv_id: &str, content: &str) -> Result<Comment> {
        validate::require_non_empty("content", content)?;

        let now = model::now_iso();
        let comment = Comment {
            id: model::new_id("cmt"),
            avv_id: avv_id.to_string(),
            content: content.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        db.mutate("add_comment", |tx, ctx| {
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
                "INSERT INTO comments (id, avv_id, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    comment.id,
                    comment.avv_id,
                    comment.content,
                    comment.created_at,
                    comment.updated_at,
                ],
            )?;

            ctx.record_change(avv_id, "comment", "", content);
            Ok(())
        })?;

        self.comments.insert(0, comment.clone());
        Ok(comment)
    }
}
