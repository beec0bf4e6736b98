//! Event status: derived from the clock unless manually completed.
//!
//! The persisted part is [`StatusState`]. Reading an event resolves it into an
//! [`EventStatus`] against a caller-supplied `now`, so derivation is only ever
//! applied to the `Derived` variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusState {
    /// Status follows the event's times relative to now.
    #[default]
    Derived,
    /// Pinned to completed by a user action. Terminal.
    ManuallyCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl StatusState {
    /// Resolve the visible status of an event spanning `[start, end)` at `now`.
    pub fn resolve(
        self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> EventStatus {
        match self {
            StatusState::ManuallyCompleted => EventStatus::Completed,
            StatusState::Derived => {
                if now < start {
                    EventStatus::Upcoming
                } else if now < end {
                    EventStatus::Ongoing
                } else {
                    EventStatus::Completed
                }
            }
        }
    }

    /// One-way transition to `ManuallyCompleted`. Returns `true` if the state
    /// changed.
    pub fn complete(&mut self) -> bool {
        let changed = *self != StatusState::ManuallyCompleted;
        *self = StatusState::ManuallyCompleted;
        changed
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}
