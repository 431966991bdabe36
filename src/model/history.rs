//! Change history model.

use serde::{Deserialize, Serialize};

/// One field-level change to an opportunity.
///
/// Append-only: history rows are never mutated or deleted, and they
/// outlive their opportunity (deletion does not cascade here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier (`hist_` prefix)
    pub id: String,

    /// Opportunity the change applies to
    pub avv_id: String,

    /// Name of the changed field ("status", "budget", "comment", ...)
    pub field: String,

    /// Previous value as a display string
    pub old_value: String,

    /// New value as a display string
    pub new_value: String,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}
