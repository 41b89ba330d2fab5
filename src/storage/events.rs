//! Change records collected during a mutation.
//!
//! Each repository operation records what it changed. The records are
//! emitted as `tracing` events once the transaction has committed, so a
//! rolled-back operation never logs a change that did not happen.

use tracing::info;

/// Kinds of change a mutation can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    UserCreated,
    UserUpdated,
    UserDeleted,
    TaskCreated,
    TaskDeleted,
}

impl EventType {
    /// Get the string representation used in log output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserCreated => "user_created",
            Self::UserUpdated => "user_updated",
            Self::UserDeleted => "user_deleted",
            Self::TaskCreated => "task_created",
            Self::TaskDeleted => "task_deleted",
        }
    }

    /// Entity type affected by this change.
    #[must_use]
    pub const fn entity_type(&self) -> &'static str {
        match self {
            Self::UserCreated | Self::UserUpdated | Self::UserDeleted => "user",
            Self::TaskCreated | Self::TaskDeleted => "task",
        }
    }
}

/// A single recorded change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub entity_id: i64,
    pub event_type: EventType,
    /// Free-form detail, e.g. the number of cascaded rows
    pub detail: Option<String>,
}

/// Context passed to mutation closures.
#[derive(Debug)]
pub struct MutationContext {
    /// Name of the operation being performed.
    pub op_name: String,
    /// Changes to report after commit.
    pub events: Vec<Event>,
}

impl MutationContext {
    /// Create a new mutation context.
    #[must_use]
    pub fn new(op_name: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            events: Vec::new(),
        }
    }

    /// Record a change for this operation.
    pub fn record_event(&mut self, entity_id: i64, event_type: EventType) {
        self.events.push(Event {
            entity_id,
            event_type,
            detail: None,
        });
    }

    /// Record a change with a detail string.
    pub fn record_detail(&mut self, entity_id: i64, event_type: EventType, detail: String) {
        self.events.push(Event {
            entity_id,
            event_type,
            detail: Some(detail),
        });
    }

    /// Emit the recorded changes. Call only after commit.
    pub fn emit(&self) {
        for event in &self.events {
            info!(
                op = %self.op_name,
                entity = event.event_type.entity_type(),
                id = event.entity_id,
                event = event.event_type.as_str(),
                detail = event.detail.as_deref().unwrap_or(""),
                "committed"
            );
        }
    }
}
