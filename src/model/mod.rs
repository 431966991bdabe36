//! Data models for the AVV tracker.
//!
//! This module contains all domain models:
//! - Opportunity (the AVV record itself)
//! - Comment
//! - Attachment
//! - HistoryEntry
//! - Notification

pub mod attachment;
pub mod comment;
pub mod history;
pub mod notification;
pub mod opportunity;

pub use attachment::Attachment;
pub use comment::Comment;
pub use history::HistoryEntry;
pub use notification::{Notification, NotificationKind};
pub use opportunity::{Opportunity, OpportunityDraft, OpportunityPatch, Status};

/// Current UTC time as an RFC 3339 string with millisecond precision.
///
/// All timestamps in the database use this format; descending
/// lexicographic order equals descending chronological order.
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Generate a prefixed opaque ID, e.g. `avv_1f2e3d4c-5b6`.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_prefix_and_length() {
        let id = new_id("avv");
        assert!(id.starts_with("avv_"));
        assert_eq!(id.len(), "avv_".len() + 12);
    }

    #[test]
    fn test_now_iso_is_rfc3339() {
        let ts = now_iso();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        assert!(ts.ends_with('Z'));
    }
}
