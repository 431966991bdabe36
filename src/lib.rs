//! AVV Tracker - kanban pipeline for pre-sales opportunities
//!
//! This crate provides the core functionality for the `avv` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Opportunity, Comment, Attachment, HistoryEntry, Notification)
//! - [`store`] - Entity stores: in-memory caches over the database
//! - [`storage`] - SQLite persistence gateway, schema and row codec
//! - [`config`] - Database path resolution
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod store;
pub mod validate;

pub use error::{Error, Result};

/// Global quiet flag (set by `--quiet`).
///
/// When set, commands print nothing except errors. Avoids threading
/// a `quiet` bool through every handler signature.
pub static QUIET: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if quiet mode is active.
#[inline]
pub fn is_quiet() -> bool {
    QUIET.load(std::sync::atomic::Ordering::Relaxed)
}
