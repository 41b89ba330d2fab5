//! SQLite storage layer for missions.
//!
//! This module provides the persistence layer using SQLite with:
//! - Foreign keys enforced on every connection (tasks cascade with users)
//! - A `UNIQUE` email constraint surfaced as a recoverable conflict
//! - One transaction per repository operation
//!
//! # Submodules
//!
//! - [`events`] - Change records logged after commit
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod events;
pub mod schema;
pub mod sqlite;

pub use sqlite::{DeletedUser, SqliteStorage};
