//! Data models for missions.
//!
//! This module contains the two persisted entities:
//! - User
//! - Task
//!
//! and [`Outcome`], the result of operations that need operator confirmation.

pub mod task;
pub mod user;

pub use task::{Task, TITLE_MAX_LEN};
pub use user::User;

/// Result of an operation gated on operator confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operator confirmed and the change was committed.
    Applied(T),
    /// The operator declined; nothing was written.
    Declined,
}

impl<T> Outcome<T> {
    /// Returns true if the change was committed.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}
