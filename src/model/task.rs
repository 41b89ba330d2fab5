//! Task model.

use serde::{Deserialize, Serialize};

/// Maximum title length in characters.
///
/// Titles are printed in a fixed-width column, so the store rejects longer
/// ones with a `CHECK` constraint as well.
pub const TITLE_MAX_LEN: usize = 59;

/// A task owned by a [`User`](super::User).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Auto-assigned row ID, never reused after deletion
    pub id: i64,

    /// Short title (at most [`TITLE_MAX_LEN`] characters)
    pub title: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Owning user's ID
    pub user_id: i64,
}

impl Task {
    pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            user_id: row.get(3)?,
        })
    }

    /// Title for display, `-` when unset.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("-")
    }

    /// Description for display, `-` when unset.
    #[must_use]
    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or("-")
    }
}
