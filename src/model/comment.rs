//! Comment model.

use serde::{Deserialize, Serialize};

/// A free-text comment on an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier (`cmt_` prefix)
    pub id: String,

    /// Owning opportunity
    pub avv_id: String,

    /// Comment body
    pub content: String,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}
