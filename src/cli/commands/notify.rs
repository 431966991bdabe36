//! Notification command implementations.

use crate::cli::NotifyCommands;
use crate::error::Result;
use crate::model::NotificationKind;
use crate::store::NotificationStore;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct NotifyListOutput<'a> {
    notifications: &'a [crate::model::Notification],
    count: usize,
}

/// Execute notification commands.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the
/// operation fails.
pub fn execute(command: &NotifyCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        NotifyCommands::List => list(db_path, json),
        NotifyCommands::Read { id } => read(id, db_path, json),
        NotifyCommands::Clear => clear(db_path, json),
    }
}

fn list(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let db = super::open_database(db_path)?;
    let mut store = NotificationStore::new();
    store.fetch(&db)?;

    if json {
        let output = NotifyListOutput {
            count: store.unread().len(),
            notifications: store.unread(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if store.unread().is_empty() {
        println!("No unread notifications.");
        return Ok(());
    }

    use colored::Colorize;
    println!("Unread notifications ({}):", store.unread().len());
    println!();
    for n in store.unread() {
        let title = match n.kind {
            NotificationKind::Error => n.title.red().bold(),
            NotificationKind::Warning => n.title.yellow().bold(),
            NotificationKind::Success => n.title.green().bold(),
            NotificationKind::Info => n.title.bold(),
        };
        println!("{} {} {}", n.id.dimmed(), title, n.message);
    }

    Ok(())
}

fn read(id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut db = super::open_database(db_path)?;
    let mut store = NotificationStore::new();
    store.fetch(&db)?;
    store.mark_read(&mut db, id)?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::json!({ "id": id, "read": true }));
    } else {
        println!("Marked {id} as read");
    }

    Ok(())
}

fn clear(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut db = super::open_database(db_path)?;
    let mut store = NotificationStore::new();
    store.fetch(&db)?;
    let count = store.mark_all_read(&mut db)?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::json!({ "cleared": count }));
    } else {
        println!("Marked {count} notification(s) as read");
    }

    Ok(())
}
