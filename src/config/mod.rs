//! Configuration management.
//!
//! missions keeps a single database file. This module decides where it
//! lives.

use crate::error::{Error, Result};

use std::path::{Path, PathBuf};

/// File name of the database inside the missions directory.
pub const DB_FILE_NAME: &str = "missions.db";

/// Get the global missions directory location (`~/.missions/`).
#[must_use]
pub fn global_missions_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".missions"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly. The CLI fills this
///    from `--db` or the `MISSIONS_DB` environment variable.
/// 2. Global location: `~/.missions/missions.db`
///
/// # Errors
///
/// Returns [`Error::Config`] if no explicit path was given and the home
/// directory cannot be determined.
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
    // Priority 1: Explicit path from CLI flag or environment
    if let Some(path) = explicit_path {
        if path.as_os_str().is_empty() {
            return Err(Error::Config("database path is empty".to_string()));
        }
        return Ok(path.to_path_buf());
    }

    // Priority 2: Global database location
    global_missions_dir()
        .map(|dir| dir.join(DB_FILE_NAME))
        .ok_or_else(|| Error::Config("could not determine home directory".to_string()))
}
