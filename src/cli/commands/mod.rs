//! Command implementations.

pub mod attachment;
pub mod board;
pub mod comment;
pub mod completions;
pub mod history;
pub mod init;
pub mod notify;
pub mod opportunity;
pub mod snapshot;
pub mod version;

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::Database;
use std::path::PathBuf;

/// Resolve and open the database, failing if it was never initialized.
pub(crate) fn open_database(db_path: Option<&PathBuf>) -> Result<Database> {
    let path =
        resolve_db_path(db_path.map(PathBuf::as_path)).ok_or(Error::NotInitialized)?;

    if !path.exists() {
        return Err(Error::NotInitialized);
    }

    Database::open(&path)
}
