//! Snapshot command: export a full database image.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Execute `avv snapshot`.
///
/// Regular durability is per-transaction (WAL + checkpoint); this
/// exports a complete standalone image via the backup API.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the backup
/// fails.
pub fn execute(output: &Path, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let db = super::open_database(db_path)?;
    db.snapshot_to(output)?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        println!(
            "{}",
            serde_json::json!({ "snapshot": output.display().to_string() })
        );
    } else {
        println!("Snapshot written to {}", output.display());
    }

    Ok(())
}
