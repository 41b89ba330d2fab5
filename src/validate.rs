//! Input validation shared by the storage layer and the CLI.
//!
//! Operator input arrives as raw text. These helpers turn it into the
//! values the repository operations accept, or into a validation
//! [`Error`] that leaves the store untouched.

use crate::error::{Error, Result};
use crate::model::TITLE_MAX_LEN;

/// Reject empty values for a required field.
///
/// Only the empty string is rejected; whitespace is kept as entered.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] if `value` is empty.
pub fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::RequiredField { field });
    }
    Ok(())
}

/// Check a task title against the display-width bound.
///
/// Length is counted in characters, not bytes.
///
/// # Errors
///
/// Returns [`Error::TitleTooLong`] if the title exceeds [`TITLE_MAX_LEN`].
pub fn check_title(title: &str) -> Result<()> {
    let actual = title.chars().count();
    if actual > TITLE_MAX_LEN {
        return Err(Error::TitleTooLong {
            max: TITLE_MAX_LEN,
            actual,
        });
    }
    Ok(())
}

/// Parse a task ID typed by the operator.
///
/// Surrounding whitespace is ignored. Zero, negative numbers and anything
/// non-numeric are malformed; whether the ID exists is checked later.
///
/// # Errors
///
/// Returns [`Error::MalformedTaskId`] if `input` is not a positive integer.
pub fn parse_task_id(input: &str) -> Result<i64> {
    match input.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::MalformedTaskId {
            input: input.to_string(),
        }),
    }
}

/// Interpret a yes/no answer. Only `yes` confirms.
#[must_use]
pub fn is_confirmation(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}
