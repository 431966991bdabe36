//! Comment command implementations.

use crate::cli::CommentCommands;
use crate::error::Result;
use crate::store::CommentStore;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct CommentListOutput<'a> {
    comments: &'a [crate::model::Comment],
    count: usize,
}

/// Execute comment commands.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the
/// operation fails.
pub fn execute(command: &CommentCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        CommentCommands::Add { id, content } => add(id, content, db_path, json),
        CommentCommands::List { id } => list(id, db_path, json),
    }
}

fn add(id: &str, content: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut db = super::open_database(db_path)?;
    let mut store = CommentStore::new();

    let comment = store.add(&mut db, id, content)?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&comment)?);
    } else {
        println!("Added comment {} to {}", comment.id, comment.avv_id);
    }

    Ok(())
}

fn list(id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let db = super::open_database(db_path)?;
    let mut store = CommentStore::new();
    store.fetch_for(&db, id)?;

    if json {
        let output = CommentListOutput {
            count: store.all().len(),
            comments: store.all(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if store.all().is_empty() {
        println!("No comments found.");
        return Ok(());
    }

    use colored::Colorize;
    println!("Comments ({} found):", store.all().len());
    println!();
    for c in store.all() {
        println!("{} {}", c.created_at.dimmed(), c.content);
    }

    Ok(())
}
