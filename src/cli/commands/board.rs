//! Kanban board and pipeline statistics.

use crate::error::Result;
use crate::model::{Opportunity, Status};
use crate::store::OpportunityStore;
use serde::Serialize;
use std::path::PathBuf;

/// The board shows one column per open stage plus a single combined
/// closed column, like the original kanban view.
const OPEN_COLUMNS: [Status; 4] = [
    Status::Reception,
    Status::Analyse,
    Status::Proposition,
    Status::Validation,
];

#[derive(Serialize)]
struct StatsOutput {
    total: usize,
    in_pipeline: usize,
    won: usize,
    lost: usize,
    open_budget: f64,
}

/// Execute `avv board`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the fetch fails.
pub fn execute_board(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let db = super::open_database(db_path)?;
    let mut store = OpportunityStore::new();
    store.fetch(&db)?;

    if json {
        let mut columns = serde_json::Map::new();
        for status in OPEN_COLUMNS {
            columns.insert(
                status.as_str().to_string(),
                serde_json::to_value(column_records(store.all(), status))?,
            );
        }
        let closed: Vec<&Opportunity> = store
            .all()
            .iter()
            .filter(|o| o.status.is_closed())
            .collect();
        columns.insert("cloture".to_string(), serde_json::to_value(closed)?);
        println!("{}", serde_json::Value::Object(columns));
        return Ok(());
    }

    use colored::Colorize;
    for status in OPEN_COLUMNS {
        let records = column_records(store.all(), status);
        println!(
            "{} ({})",
            status.label().cyan().bold(),
            records.len()
        );
        for o in &records {
            println!("  {} {} / {}", o.id.dimmed(), o.client_name, o.project_name);
        }
        println!();
    }

    let closed: Vec<&Opportunity> = store
        .all()
        .iter()
        .filter(|o| o.status.is_closed())
        .collect();
    println!("{} ({})", "Closed".cyan().bold(), closed.len());
    for o in closed {
        let marker = if o.status == Status::ClotureGagne {
            "won".green()
        } else {
            "lost".red()
        };
        println!(
            "  {} {} / {} [{}]",
            o.id.dimmed(),
            o.client_name,
            o.project_name,
            marker
        );
    }

    Ok(())
}

fn column_records(all: &[Opportunity], status: Status) -> Vec<&Opportunity> {
    all.iter().filter(|o| o.status == status).collect()
}

/// Execute `avv stats`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the fetch fails.
pub fn execute_stats(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let db = super::open_database(db_path)?;
    let mut store = OpportunityStore::new();
    store.fetch(&db)?;

    let total = store.all().len();
    let won = store
        .all()
        .iter()
        .filter(|o| o.status == Status::ClotureGagne)
        .count();
    let lost = store
        .all()
        .iter()
        .filter(|o| o.status == Status::CloturePerdu)
        .count();
    let in_pipeline = total - won - lost;
    let open_budget: f64 = store
        .all()
        .iter()
        .filter(|o| !o.status.is_closed())
        .map(|o| o.budget)
        .sum();

    if json {
        let output = StatsOutput {
            total,
            in_pipeline,
            won,
            lost,
            open_budget,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    use colored::Colorize;
    println!("{}", "Pipeline".cyan().bold());
    println!("  Total:       {total}");
    println!("  In pipeline: {in_pipeline}");
    println!("  Won:         {}", won.to_string().green());
    println!("  Lost:        {}", lost.to_string().red());
    println!("  Open budget: {}", crate::model::opportunity::display_budget(open_budget));

    Ok(())
}
