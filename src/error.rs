//! Error types for the AVV tracker CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for AVV tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    AlreadyInitialized,
    DatabaseError,

    // Not Found (exit 3)
    OpportunityNotFound,
    AttachmentNotFound,
    NotificationNotFound,

    // Validation (exit 4)
    InvalidStatus,
    InvalidArgument,
    RequiredField,

    // Protection (exit 5)
    DeleteProtected,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::OpportunityNotFound => "OPPORTUNITY_NOT_FOUND",
            Self::AttachmentNotFound => "ATTACHMENT_NOT_FOUND",
            Self::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::DeleteProtected => "DELETE_PROTECTED",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::NotInitialized | Self::AlreadyInitialized | Self::DatabaseError => 2,
            Self::OpportunityNotFound | Self::AttachmentNotFound | Self::NotificationNotFound => 3,
            Self::InvalidStatus | Self::InvalidArgument | Self::RequiredField => 4,
            Self::DeleteProtected => 5,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether a caller should retry with corrected input.
    ///
    /// True for validation errors. False for not-found, I/O, or
    /// internal errors.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatus | Self::InvalidArgument | Self::RequiredField
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in AVV tracker operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: run `avv init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Opportunity not found: {id}")]
    OpportunityNotFound { id: String },

    #[error("Opportunity not found: {id} (did you mean: {}?)", similar.join(", "))]
    OpportunityNotFoundSimilar { id: String, similar: Vec<String> },

    #[error("Attachment not found: {id}")]
    AttachmentNotFound { id: String },

    #[error("Notification not found: {id}")]
    NotificationNotFound { id: String },

    #[error("Invalid status: {input}")]
    InvalidStatus {
        input: String,
        suggestion: Option<String>,
    },

    #[error("Required field is missing or empty: {0}")]
    RequiredField(&'static str),

    #[error("Cannot delete opportunity {id}: status is '{status}'")]
    DeleteProtected { id: String, status: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::OpportunityNotFound { .. } | Self::OpportunityNotFoundSimilar { .. } => {
                ErrorCode::OpportunityNotFound
            }
            Self::AttachmentNotFound { .. } => ErrorCode::AttachmentNotFound,
            Self::NotificationNotFound { .. } => ErrorCode::NotificationNotFound,
            Self::InvalidStatus { .. } => ErrorCode::InvalidStatus,
            Self::RequiredField(_) => ErrorCode::RequiredField,
            Self::DeleteProtected { .. } => ErrorCode::DeleteProtected,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => Some("Run `avv init` to create the database".to_string()),

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to reinitialize.",
                path.display()
            )),

            Self::OpportunityNotFound { id } => Some(format!(
                "No opportunity with ID '{id}'. Use `avv list` to see available records."
            )),
            Self::OpportunityNotFoundSimilar { similar, .. } => {
                Some(format!("Did you mean: {}?", similar.join(", ")))
            }

            Self::AttachmentNotFound { id } => Some(format!(
                "No attachment with ID '{id}'. Use `avv attach list <opportunity-id>`."
            )),

            Self::NotificationNotFound { id } => Some(format!(
                "No unread notification with ID '{id}'. Use `avv notify list`."
            )),

            Self::InvalidStatus { suggestion, .. } => match suggestion {
                Some(s) => Some(format!("Did you mean '{s}'?")),
                None => Some(
                    "Valid statuses: reception, analyse, proposition, validation, \
                     cloture_gagne, cloture_perdu. Synonyms: won, lost, new"
                        .to_string(),
                ),
            },

            Self::DeleteProtected { .. } => Some(
                "Opportunities in validation or a closed state cannot be deleted."
                    .to_string(),
            ),

            Self::RequiredField(field) => {
                Some(format!("Provide a non-empty value for '{field}'."))
            }

            Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
