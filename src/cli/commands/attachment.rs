//! Attachment command implementations.

use crate::cli::AttachCommands;
use crate::error::{Error, Result};
use crate::store::AttachmentStore;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct AttachmentInfo<'a> {
    id: &'a str,
    name: &'a str,
    mime_type: &'a str,
    size: i64,
}

/// Execute attachment commands.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the
/// operation fails.
pub fn execute(command: &AttachCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        AttachCommands::Add {
            id,
            file,
            name,
            mime,
        } => add(id, file, name.as_deref(), mime.as_deref(), db_path, json),
        AttachCommands::List { id } => list(id, db_path, json),
        AttachCommands::Delete { id, avv } => delete(id, avv, db_path, json),
    }
}

fn add(
    id: &str,
    file: &Path,
    name: Option<&str>,
    mime: Option<&str>,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let bytes = fs::read(file)?;
    let name = match name {
        Some(n) => n.to_string(),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::InvalidArgument(format!("not a file path: {}", file.display()))
            })?,
    };
    let mime_type = mime.map_or_else(|| guess_mime(&name).to_string(), str::to_string);

    let mut db = super::open_database(db_path)?;
    let mut store = AttachmentStore::new();
    let attachment = store.add(&mut db, id, &name, &mime_type, &bytes)?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        let output = AttachmentInfo {
            id: &attachment.id,
            name: &attachment.name,
            mime_type: &attachment.mime_type,
            size: attachment.size,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "Attached {} ({}, {} bytes) to {}",
            attachment.name, attachment.mime_type, attachment.size, id
        );
    }

    Ok(())
}

fn list(id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let db = super::open_database(db_path)?;
    let mut store = AttachmentStore::new();
    store.fetch_for(&db, id)?;

    if json {
        let items: Vec<AttachmentInfo> = store
            .all()
            .iter()
            .map(|a| AttachmentInfo {
                id: &a.id,
                name: &a.name,
                mime_type: &a.mime_type,
                size: a.size,
            })
            .collect();
        println!("{}", serde_json::to_string(&items)?);
        return Ok(());
    }

    if store.all().is_empty() {
        println!("No attachments found.");
        return Ok(());
    }

    use colored::Colorize;
    println!("Attachments ({} found):", store.all().len());
    println!();
    for a in store.all() {
        println!("{} {} ({}, {} bytes)", a.id.dimmed(), a.name, a.mime_type, a.size);
    }

    Ok(())
}

fn delete(id: &str, avv_id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut db = super::open_database(db_path)?;
    let mut store = AttachmentStore::new();
    // Populate the cache so the store can resolve the attachment
    store.fetch_for(&db, avv_id)?;

    store.delete(&mut db, id)?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::json!({ "id": id, "deleted": true }));
    } else {
        println!("Removed attachment {id}");
    }

    Ok(())
}

/// Guess a MIME type from the file extension.
fn guess_mime(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("zip") => "application/zip",
        Some("doc" | "docx") => "application/msword",
        Some("xls" | "xlsx") => "application/vnd.ms-excel",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("brief.pdf"), "application/pdf");
        assert_eq!(guess_mime("photo.JPG"), "image/jpeg");
        assert_eq!(guess_mime("archive.tar.gz"), "application/octet-stream");
        assert_eq!(guess_mime("noextension"), "application/octet-stream");
    }
}
