//! Opportunity command implementations (add/list/show/update/move/delete).

use crate::cli::{AddArgs, ListArgs, UpdateArgs};
use crate::error::{Error, Result};
use crate::model::{Opportunity, OpportunityDraft, OpportunityPatch};
use crate::store::{AttachmentStore, CommentStore, OpportunityStore};
use crate::validate;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct ListOutput<'a> {
    opportunities: &'a [Opportunity],
    count: usize,
}

/// Execute `avv add`.
///
/// # Errors
///
/// Returns a validation error for bad input, or a database error.
pub fn execute_add(args: &AddArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let status = validate::normalize_status(&args.status)?;
    let mut db = super::open_database(db_path)?;
    let mut store = OpportunityStore::new();

    let added = store.add(
        &mut db,
        OpportunityDraft {
            client_name: args.client.clone(),
            project_name: args.project.clone(),
            budget: args.budget,
            deadline: args.deadline.clone(),
            needs: args.needs.clone(),
            technologies: args.tech.clone(),
            status,
        },
    )?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&added)?);
    } else {
        println!("Created opportunity {}", added.id);
        println!("  {} / {} [{}]", added.client_name, added.project_name, added.status);
    }

    Ok(())
}

/// Execute `avv list`.
///
/// # Errors
///
/// Returns an error if the status filter is invalid or the fetch fails.
pub fn execute_list(args: &ListArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let status_filter = if args.status == "all" {
        None
    } else {
        Some(validate::normalize_status(&args.status)?)
    };

    let db = super::open_database(db_path)?;
    let mut store = OpportunityStore::new();
    store.fetch(&db)?;

    let selected: Vec<&Opportunity> = store
        .all()
        .iter()
        .filter(|o| status_filter.is_none_or(|s| o.status == s))
        .take(args.limit)
        .collect();

    if json {
        let records: Vec<Opportunity> = selected.iter().map(|o| (*o).clone()).collect();
        let output = ListOutput {
            count: records.len(),
            opportunities: &records,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("No opportunities found.");
        return Ok(());
    }

    println!("Opportunities ({} found):", selected.len());
    println!();
    for o in selected {
        print_summary_line(o);
    }

    Ok(())
}

fn print_summary_line(o: &Opportunity) {
    use colored::Colorize;

    println!(
        "{} {} / {} [{}]",
        o.id.dimmed(),
        o.client_name.bold(),
        o.project_name,
        o.status.as_str().cyan()
    );
    println!(
        "    budget {}  deadline {}  tech {}",
        o.budget_display(),
        o.deadline,
        if o.technologies.is_empty() {
            "-".to_string()
        } else {
            o.technologies_display()
        }
    );
}

/// Execute `avv show`.
///
/// # Errors
///
/// Returns not-found if the id is unknown.
pub fn execute_show(id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    use colored::Colorize;

    let db = super::open_database(db_path)?;
    let mut store = OpportunityStore::new();
    store.fetch(&db)?;

    let record = store
        .get(id)
        .cloned()
        .ok_or_else(|| Error::OpportunityNotFound { id: id.to_string() })?;

    let mut comments = CommentStore::new();
    comments.fetch_for(&db, id)?;
    let mut attachments = AttachmentStore::new();
    attachments.fetch_for(&db, id)?;

    if json {
        let output = serde_json::json!({
            "opportunity": record,
            "comments": comments.all(),
            "attachments": attachments.all(),
        });
        println!("{output}");
        return Ok(());
    }

    println!("{}", record.id.bold());
    println!("  Client:   {}", record.client_name);
    println!("  Project:  {}", record.project_name);
    println!("  Status:   {}", record.status.as_str().cyan());
    println!("  Budget:   {}", record.budget_display());
    println!("  Deadline: {}", record.deadline);
    if !record.needs.is_empty() {
        println!("  Needs:    {}", record.needs);
    }
    if !record.technologies.is_empty() {
        println!("  Tech:     {}", record.technologies_display());
    }
    println!("  Created:  {}", record.created_at);
    println!("  Updated:  {}", record.updated_at);

    if !comments.all().is_empty() {
        println!();
        println!("{}", "Comments".cyan().bold());
        for c in comments.all() {
            println!("  {} {}", c.created_at.dimmed(), c.content);
        }
    }

    if !attachments.all().is_empty() {
        println!();
        println!("{}", "Attachments".cyan().bold());
        for a in attachments.all() {
            println!("  {} {} ({}, {} bytes)", a.id.dimmed(), a.name, a.mime_type, a.size);
        }
    }

    Ok(())
}

/// Execute `avv update`.
///
/// # Errors
///
/// Returns not-found for an unknown id or a validation error for bad
/// patch values.
pub fn execute_update(args: &UpdateArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let status = args
        .status
        .as_deref()
        .map(validate::normalize_status)
        .transpose()?;

    let patch = OpportunityPatch {
        client_name: args.client.clone(),
        project_name: args.project.clone(),
        budget: args.budget,
        deadline: args.deadline.clone(),
        needs: args.needs.clone(),
        technologies: args.tech.clone(),
        status,
    };

    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to update: pass at least one field flag".to_string(),
        ));
    }

    let mut db = super::open_database(db_path)?;
    let mut store = OpportunityStore::new();
    store.fetch(&db)?;

    let updated = store.update(&mut db, &args.id, patch)?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&updated)?);
    } else {
        println!("Updated opportunity {}", updated.id);
    }

    Ok(())
}

/// Execute `avv move`.
///
/// # Errors
///
/// Returns an invalid-status error (including the won/lost choice for
/// ambiguous "closed" inputs) or not-found.
pub fn execute_move(
    id: &str,
    status: &str,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let status = validate::normalize_status(status)?;

    let mut db = super::open_database(db_path)?;
    let mut store = OpportunityStore::new();
    store.fetch(&db)?;

    let updated = store.update_status(&mut db, id, status)?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&updated)?);
    } else {
        println!("Moved {} to {}", updated.id, updated.status);
    }

    Ok(())
}

/// Execute `avv delete`.
///
/// The delete protection for validation/closed records lives here,
/// at the caller boundary; the store deletes whatever it is told to.
///
/// # Errors
///
/// Returns [`Error::DeleteProtected`] for protected records,
/// not-found for unknown ids.
pub fn execute_delete(id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut db = super::open_database(db_path)?;
    let mut store = OpportunityStore::new();
    store.fetch(&db)?;

    let record = store
        .get(id)
        .ok_or_else(|| Error::OpportunityNotFound { id: id.to_string() })?;

    if record.status.is_delete_protected() {
        return Err(Error::DeleteProtected {
            id: id.to_string(),
            status: record.status.to_string(),
        });
    }

    store.delete(&mut db, id)?;

    if crate::is_quiet() {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::json!({ "id": id, "deleted": true }));
    } else {
        println!("Deleted opportunity {id}");
    }

    Ok(())
}
