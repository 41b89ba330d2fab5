//! Command implementations.

pub mod completions;
pub mod menu;
pub mod task;
pub mod user;
pub mod version;

use crate::config::resolve_db_path;
use crate::error::Result;
use crate::storage::SqliteStorage;
use std::path::PathBuf;

/// Resolve the database path and open it, creating it on first use.
pub(crate) fn open_storage(db_path: Option<&PathBuf>) -> Result<SqliteStorage> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path))?;
    SqliteStorage::open(&db_path)
}
