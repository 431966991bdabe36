//! Attachment model.
//!
//! Attachment content is stored inline in the database as base64
//! text. No size cap is enforced, which bounds practical usage to
//! small files.

use serde::{Deserialize, Serialize};

/// A file attached to an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier (`att_` prefix)
    pub id: String,

    /// Owning opportunity
    pub avv_id: String,

    /// Original file name
    pub name: String,

    /// MIME type
    pub mime_type: String,

    /// Decoded size in bytes
    pub size: i64,

    /// File content, base64-encoded
    pub data: String,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}
