//! Request parsing and response shapes for the outer surfaces (CLI, HTTP).
//!
//! Everything that crosses the boundary goes through here: raw strings are
//! parsed and validated before they reach the engine, and results are turned
//! into camelCase DTOs with instants rendered in the display timezone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::availability::{self, AvailabilityOptions, ScheduleSource, StaffAvailability};
use crate::conflict;
use crate::error::{Result, RotaError};
use crate::freebusy::FreeSlot;
use crate::interval::{Interval, Window};
use crate::model::{Event, EventId, EventType, StaffId, StaffMember};
use crate::status::EventStatus;
use crate::store::InMemoryStore;
use crate::timezone;

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Renders instants in a fixed display timezone.
#[derive(Debug, Clone, Copy)]
pub struct Presenter {
    tz: Tz,
}

impl Presenter {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn instant(&self, instant: DateTime<Utc>) -> String {
        timezone::format_instant(instant, self.tz)
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::utc()
    }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// Parse a required instant parameter. Blank counts as missing.
pub fn parse_param(name: &'static str, value: Option<&str>, tz: Tz) -> Result<DateTime<Utc>> {
    match value.map(str::trim) {
        None | Some("") => Err(RotaError::MissingParameter(name)),
        Some(text) => timezone::parse_instant(text, tz),
    }
}

/// Parse and validate an availability window.
///
/// # Errors
/// `MissingParameter` for an absent bound, `InvalidDatetime` for an
/// unparseable one, `InvalidWindow` when `start >= end`.
pub fn parse_window(start: Option<&str>, end: Option<&str>, tz: Tz) -> Result<Window> {
    let start = parse_param("start", start, tz)?;
    let end = parse_param("end", end, tz)?;
    Window::new(start, end)
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlotDto {
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityEntry {
    pub id: StaffId,
    pub name: String,
    pub is_busy: bool,
    pub next_available: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_slots: Option<Vec<FreeSlotDto>>,
}

impl Presenter {
    fn free_slot(&self, slot: &FreeSlot) -> FreeSlotDto {
        FreeSlotDto {
            start: self.instant(slot.start),
            end: self.instant(slot.end),
            duration_minutes: slot.duration_minutes,
        }
    }

    pub fn availability(&self, result: &StaffAvailability) -> AvailabilityEntry {
        AvailabilityEntry {
            id: result.id,
            name: result.name.clone(),
            is_busy: result.is_busy,
            next_available: self.instant(result.next_available),
            free_slots: result
                .free_slots
                .as_ref()
                .map(|slots| slots.iter().map(|s| self.free_slot(s)).collect()),
        }
    }
}

/// The availability endpoint: parse the window, compute, serialize.
pub fn query_availability<S>(
    source: &S,
    start: Option<&str>,
    end: Option<&str>,
    options: AvailabilityOptions,
    presenter: &Presenter,
) -> Result<Vec<AvailabilityEntry>>
where
    S: ScheduleSource + ?Sized,
{
    let window = parse_window(start, end, presenter.timezone())?;
    let results = availability::compute_availability(source, &window, options)?;
    Ok(results.iter().map(|r| presenter.availability(r)).collect())
}

// ---------------------------------------------------------------------------
// Staff and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffView {
    pub id: StaffId,
    pub name: String,
    pub email: String,
    pub designation: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssigneeDetails {
    pub name: String,
    pub email: String,
    pub designation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeView {
    pub staff_id: StaffId,
    pub staff: AssigneeDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: EventId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_type: EventType,
    pub start: String,
    pub end: String,
    pub status: EventStatus,
    pub assigned_to: Vec<AssigneeView>,
}

impl Presenter {
    pub fn staff(&self, member: &StaffMember) -> StaffView {
        StaffView {
            id: member.id,
            name: member.name.clone(),
            email: member.email.clone(),
            designation: member.designation.clone(),
            created_at: self.instant(member.created_at),
            updated_at: self.instant(member.updated_at),
        }
    }

    /// Render an event with its assignees and its status as of `now`.
    pub fn event(
        &self,
        store: &InMemoryStore,
        event: &Event,
        now: DateTime<Utc>,
    ) -> Result<EventView> {
        let assigned_to = store
            .assignees(event.id)?
            .into_iter()
            .map(|member| AssigneeView {
                staff_id: member.id,
                staff: AssigneeDetails {
                    name: member.name.clone(),
                    email: member.email.clone(),
                    designation: member.designation.clone(),
                },
            })
            .collect();

        Ok(EventView {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            event_type: event.event_type,
            start: self.instant(event.start),
            end: self.instant(event.end),
            status: event.status_at(now),
            assigned_to,
        })
    }
}

/// Filter for event listings.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Case-insensitive substring matched against the title, the description
    /// and every assignee's designation.
    pub text: Option<String>,
    /// Only events overlapping this range (calendar view).
    pub range: Option<Window>,
}

fn matches_text(store: &InMemoryStore, event: &Event, needle: &str) -> Result<bool> {
    let hit = |field: &str| field.to_lowercase().contains(needle);
    if hit(&event.title) || event.description.as_deref().is_some_and(hit) {
        return Ok(true);
    }
    Ok(store
        .assignees(event.id)?
        .iter()
        .any(|member| hit(&member.designation)))
}

fn matches_range(event: &Event, range: &Window) -> bool {
    Interval::new(event.start, event.end)
        .map(|interval| interval.overlaps(range.as_interval()))
        .unwrap_or(false)
}

/// List events matching `query`, sorted by start time (ties by id).
pub fn search_events(
    store: &InMemoryStore,
    query: &EventQuery,
    now: DateTime<Utc>,
    presenter: &Presenter,
) -> Result<Vec<EventView>> {
    let needle = query
        .text
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let mut events = Vec::new();
    for event in store.list_events() {
        if let Some(range) = &query.range {
            if !matches_range(event, range) {
                continue;
            }
        }
        if let Some(needle) = &needle {
            if !matches_text(store, event, needle)? {
                continue;
            }
        }
        events.push(event);
    }
    events.sort_by_key(|event| (event.start, event.id));

    events
        .into_iter()
        .map(|event| presenter.event(store, event, now))
        .collect()
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictView {
    pub event_a: EventId,
    pub event_b: EventId,
    pub start: String,
    pub end: String,
    pub overlap_minutes: i64,
}

/// Double bookings among the events a staff member is assigned to.
pub fn staff_conflicts(
    store: &InMemoryStore,
    staff_id: StaffId,
    presenter: &Presenter,
) -> Result<Vec<ConflictView>> {
    let mut events: Vec<(EventId, Interval)> = store
        .events_for_staff(staff_id)?
        .into_iter()
        .filter_map(|event| {
            Interval::new(event.start, event.end)
                .ok()
                .map(|interval| (event.id, interval))
        })
        .collect();
    events.sort_by_key(|(id, interval)| (interval.start(), *id));

    Ok(conflict::find_conflicts(&events)
        .into_iter()
        .map(|c| ConflictView {
            event_a: c.event_a,
            event_b: c.event_b,
            start: presenter.instant(c.overlap.start()),
            end: presenter.instant(c.overlap.end()),
            overlap_minutes: c.overlap_minutes,
        })
        .collect())
}
