//! History command implementation.

use crate::error::Result;
use crate::store::HistoryStore;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct HistoryOutput<'a> {
    history: &'a [crate::model::HistoryEntry],
    count: usize,
}

/// Execute `avv history`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the query fails.
pub fn execute(id: &str, limit: u32, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let db = super::open_database(db_path)?;
    let mut store = HistoryStore::new();
    store.fetch_for(&db, id, Some(limit))?;

    if json {
        let output = HistoryOutput {
            count: store.all().len(),
            history: store.all(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if store.all().is_empty() {
        println!("No history found.");
        return Ok(());
    }

    use colored::Colorize;
    println!("History ({} entries):", store.all().len());
    println!();
    for entry in store.all() {
        let change = match (entry.old_value.as_str(), entry.new_value.as_str()) {
            ("", new) => new.to_string(),
            (old, "") => old.to_string(),
            (old, new) => format!("{old} -> {new}"),
        };
        println!(
            "{} {} {}",
            entry.created_at.dimmed(),
            entry.field.cyan(),
            change
        );
    }

    Ok(())
}
