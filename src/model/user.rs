//! User model.
//!
//! Users are identified to the operator by email address. Each user owns
//! zero or more [`Task`](super::Task)s, which are deleted with it.

use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Auto-assigned row ID, never reused after deletion
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address, unique across all users (case-sensitive)
    pub email: String,
}

impl User {
    pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
        })
    }
}
