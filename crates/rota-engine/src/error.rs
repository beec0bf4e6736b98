//! Error types for rota-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{EventId, StaffId};

#[derive(Error, Debug)]
pub enum RotaError {
    /// A query window whose start is not strictly before its end.
    #[error("Invalid window: start {start} must be before end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Malformed interval: start {start} is after end {end}")]
    MalformedInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Staff member {0} not found")]
    StaffNotFound(StaffId),

    #[error("Event {0} not found")]
    EventNotFound(EventId),

    #[error("Staff member {staff_id} is already assigned to event {event_id}")]
    DuplicateAssignment { event_id: EventId, staff_id: StaffId },

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl RotaError {
    /// Whether the error was caused by the caller's input rather than by
    /// storage or serialization.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RotaError::Snapshot(_))
    }
}

pub type Result<T> = std::result::Result<T, RotaError>;
