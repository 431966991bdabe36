//! SQLite storage layer for the AVV tracker.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode with a checkpoint after every mutating transaction
//! - Transaction discipline for atomic writes
//! - A mutation outbox for history rows and notifications
//!
//! # Submodules
//!
//! - [`codec`] - Row codec between domain records and SQLite rows
//! - [`events`] - Mutation outbox (field changes, alerts)
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - The persistence gateway

pub mod codec;
pub mod events;
pub mod schema;
pub mod sqlite;

pub use events::{Alert, FieldChange, MutationContext};
pub use sqlite::Database;
