//! Domain records held by the event store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RotaError};
use crate::schedule::Span;
use crate::status::{EventStatus, StatusState};

pub type StaffId = u64;
pub type EventId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub email: String,
    /// Free-text role label, e.g. "Nurse" or "Team Lead".
    pub designation: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a staff member. All three are
/// required and must be non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaffDraft {
    pub name: String,
    pub email: String,
    pub designation: String,
}

impl StaffDraft {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("designation", &self.designation),
        ] {
            if value.trim().is_empty() {
                return Err(RotaError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Regular,
    Holiday,
}

impl std::str::FromStr for EventType {
    type Err = RotaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "regular" => Ok(EventType::Regular),
            "holiday" => Ok(EventType::Holiday),
            other => Err(RotaError::Validation(format!(
                "unknown event type '{other}' (expected regular or holiday)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub event_type: EventType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: StatusState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        self.status.resolve(self.start, self.end, now)
    }
}

/// Fields accepted when creating or updating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Staff to assign. On update this replaces the whole assignee list.
    pub staff_ids: Vec<StaffId>,
}

impl EventDraft {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(RotaError::Validation("title is required".to_string()));
        }
        if self.start > self.end {
            return Err(RotaError::MalformedInterval {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Join record between an event and a staff member. `(event_id, staff_id)`
/// is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub event_id: EventId,
    pub staff_id: StaffId,
}
