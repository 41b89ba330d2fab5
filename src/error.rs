//! Error types for the missions CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, 5=conflict, ...)
//! - Recoverability flags so the menu loop can keep going
//! - Operator-facing recovery hints
//! - Structured JSON output for `--json` consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for missions operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    DatabaseError,

    // Not Found (exit 3)
    UserNotFound,
    TaskNotFound,

    // Validation (exit 4)
    RequiredField,
    TitleTooLong,
    MalformedTaskId,
    InvalidArgument,

    // Conflict (exit 5)
    EmailInUse,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::TitleTooLong => "TITLE_TOO_LONG",
            Self::MalformedTaskId => "MALFORMED_TASK_ID",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::EmailInUse => "EMAIL_IN_USE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::DatabaseError => 2,
            Self::UserNotFound | Self::TaskNotFound => 3,
            Self::RequiredField
            | Self::TitleTooLong
            | Self::MalformedTaskId
            | Self::InvalidArgument => 4,
            Self::EmailInUse => 5,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the operator can fix the input and try again.
    ///
    /// True for validation failures and integrity conflicts. Nothing was
    /// written when one of these is returned.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound
                | Self::TaskNotFound
                | Self::RequiredField
                | Self::TitleTooLong
                | Self::MalformedTaskId
                | Self::InvalidArgument
                | Self::EmailInUse
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in missions operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No user found with email: {email}")]
    UserNotFound { email: String },

    #[error("No task {id} found for {email}")]
    TaskNotFound { id: i64, email: String },

    #[error("{field} cannot be empty")]
    RequiredField { field: &'static str },

    #[error("Title is {actual} characters long (max {max})")]
    TitleTooLong { max: usize, actual: usize },

    #[error("Task ID must be a positive number, got '{input}'")]
    MalformedTaskId { input: String },

    #[error("Email already in use: {email}")]
    EmailInUse { email: String },

    #[error("Could not open database at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::UserNotFound { .. } => ErrorCode::UserNotFound,
            Self::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            Self::RequiredField { .. } => ErrorCode::RequiredField,
            Self::TitleTooLong { .. } => ErrorCode::TitleTooLong,
            Self::MalformedTaskId { .. } => ErrorCode::MalformedTaskId,
            Self::EmailInUse { .. } => ErrorCode::EmailInUse,
            Self::Open { .. } | Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// True if this error is a write-time integrity conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailInUse { .. })
    }

    /// Operator-facing recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::UserNotFound { .. } => {
                Some("Use `missions user list` to see registered emails.".to_string())
            }
            Self::TaskNotFound { email, .. } => Some(format!(
                "Use `missions task list {email}` to see this user's task IDs."
            )),
            Self::EmailInUse { .. } => {
                Some("Please use a different email address.".to_string())
            }
            Self::TitleTooLong { max, .. } => {
                Some(format!("Shorten the title to at most {max} characters."))
            }
            Self::MalformedTaskId { .. } => {
                Some("Task IDs are the numbers shown by `missions task list`.".to_string())
            }
            Self::Open { path, .. } => Some(format!(
                "Check that {} is writable, or pass --db <path>.",
                path.display()
            )),
            Self::Config(_) => Some("Pass --db <path> or set MISSIONS_DB.".to_string()),
            Self::RequiredField { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "recoverable": code.is_recoverable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
