//! Configuration management.
//!
//! Resolves where the AVV database lives. There is exactly one
//! database per user; commands may override the location with the
//! `--db` flag or the `AVV_DB` environment variable.

use std::path::{Path, PathBuf};

/// Base directory for AVV tracker data: `~/.avv-tracker`.
#[must_use]
pub fn global_data_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".avv-tracker"))
}

/// Default database file: `~/.avv-tracker/data/avv.db`.
#[must_use]
pub fn default_db_path() -> Option<PathBuf> {
    global_data_dir().map(|dir| dir.join("data").join("avv.db"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. Explicit path from the `--db` flag
/// 2. `AVV_DB` environment variable
/// 3. Default location: `~/.avv-tracker/data/avv.db`
///
/// # Returns
///
/// Returns the path to the database file, or `None` if no location
/// could be determined.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var("AVV_DB") {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    default_db_path()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/explicit.db");
        assert_eq!(
            resolve_db_path(Some(&explicit)),
            Some(PathBuf::from("/tmp/explicit.db"))
        );
    }

    #[test]
    fn test_default_is_under_home() {
        if let Some(path) = default_db_path() {
            assert!(path.ends_with("data/avv.db"));
        }
    }
}
