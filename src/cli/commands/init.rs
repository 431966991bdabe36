//! Initialize the AVV database.

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::Database;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
}

/// Execute the init command.
///
/// Creates the database file (parent directories included) and
/// applies the schema.
///
/// # Errors
///
/// Returns an error if the database already exists (without
/// `--force`) or cannot be created.
pub fn execute(db_path: Option<&PathBuf>, force: bool, json: bool) -> Result<()> {
    let path = resolve_db_path(db_path.map(PathBuf::as_path)).ok_or_else(|| {
        Error::Other("Could not determine a database location".to_string())
    })?;

    if path.exists() && !force {
        return Err(Error::AlreadyInitialized { path });
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if force && path.exists() {
        fs::remove_file(&path)?;
    }

    // Opening applies the schema
    let db = Database::open(&path)?;
    drop(db);

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        let output = InitOutput {
            database: path.clone(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Initialized AVV database");
        println!("  Database: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("avv.db");

        execute(Some(&path), false, false).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("avv.db");

        execute(Some(&path), false, false).unwrap();
        let result = execute(Some(&path), false, false);
        assert!(matches!(result, Err(Error::AlreadyInitialized { .. })));
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("avv.db");

        execute(Some(&path), false, false).unwrap();
        execute(Some(&path), true, false).unwrap();
        assert!(path.exists());
    }
}
