//! Entity stores: in-memory caches over the database tables.
//!
//! One store per entity. Each store owns a cache mirroring its
//! table, exposes fetch/add/update/delete operations that wrap one
//! transaction each, and patches the cache only after a successful
//! commit + checkpoint. A failed mutation leaves the cache untouched.
//!
//! Stores hold no database handle; the [`crate::storage::Database`]
//! is passed to every call, so tests construct isolated instances.
//!
//! # Submodules
//!
//! - [`opportunity`] - AVV records, pipeline moves, delete
//! - [`comment`] - Comments per opportunity
//! - [`attachment`] - File attachments per opportunity
//! - [`history`] - Read side of the append-only change history
//! - [`notification`] - Unread notification queue

pub mod attachment;
pub mod comment;
pub mod history;
pub mod notification;
pub mod opportunity;

pub use attachment::AttachmentStore;
pub use comment::CommentStore;
pub use history::HistoryStore;
pub use notification::NotificationStore;
pub use opportunity::OpportunityStore;
