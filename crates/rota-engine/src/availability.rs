//! Per-staff availability within a requested window.
//!
//! For each staff member the engine answers three questions about a window
//! `[start, end)`: are they busy at any point in it, when are they next free,
//! and which sub-intervals of the window are still open.
//!
//! The computation is pure. Storage is reached only through the
//! [`ScheduleSource`] capability, which hands over each staff member's raw
//! event spans; everything after that is in-memory and deterministic.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::freebusy::{self, FreeSlot};
use crate::interval::{Interval, Window};
use crate::model::StaffId;
use crate::schedule::{ScheduleIndex, Span};

/// One staff member's commitments as handed out by a [`ScheduleSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct StaffSchedule {
    pub id: StaffId,
    pub name: String,
    /// One span per assigned event, in any order.
    pub spans: Vec<Span>,
}

/// Data access needed by the availability query: "fetch the assigned event
/// spans for staff set X".
pub trait ScheduleSource {
    /// Schedules for the given staff ids, or for the whole roster when `None`.
    /// Results are ordered by staff id. Unknown ids are an error.
    fn staff_schedules(&self, staff: Option<&[StaffId]>) -> Result<Vec<StaffSchedule>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvailabilityOptions {
    /// Compute free sub-intervals of the window as well.
    pub include_free_slots: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffAvailability {
    pub id: StaffId,
    pub name: String,
    pub is_busy: bool,
    /// The window start when free; otherwise the latest end among the
    /// overlapping commitments.
    pub next_available: DateTime<Utc>,
    /// Overlapping commitments, sorted by start, unclipped.
    pub busy: Vec<Interval>,
    pub free_slots: Option<Vec<FreeSlot>>,
}

/// Latest end among `busy`, folded from the earliest representable instant.
/// `None` when `busy` is empty.
fn latest_end(busy: &[Interval]) -> Option<DateTime<Utc>> {
    if busy.is_empty() {
        return None;
    }
    Some(
        busy.iter()
            .fold(DateTime::<Utc>::MIN_UTC, |latest, interval| {
                latest.max(interval.end())
            }),
    )
}

/// Availability of a single staff member.
///
/// `next_available` is the maximum end across all overlapping commitments, not
/// the end of the first one: a later-ending overlap keeps the member busy.
pub fn staff_availability(
    schedule: &StaffSchedule,
    window: &Window,
    options: AvailabilityOptions,
) -> StaffAvailability {
    let index = ScheduleIndex::from_spans(schedule.spans.iter().copied());
    let busy = index.overlapping(window);

    let is_busy = !busy.is_empty();
    let next_available = latest_end(&busy).unwrap_or(window.start());

    let free_slots = options
        .include_free_slots
        .then(|| freebusy::find_free_slots(&busy, window));

    StaffAvailability {
        id: schedule.id,
        name: schedule.name.clone(),
        is_busy,
        next_available,
        busy,
        free_slots,
    }
}

/// Availability for every schedule, in input order. An empty roster yields an
/// empty list.
pub fn roster_availability(
    schedules: &[StaffSchedule],
    window: &Window,
    options: AvailabilityOptions,
) -> Vec<StaffAvailability> {
    schedules
        .iter()
        .map(|schedule| staff_availability(schedule, window, options))
        .collect()
}

/// Load the whole roster from `source` and compute availability for it.
///
/// The window is already validated by construction, so the only error path is
/// the data read.
pub fn compute_availability<S>(
    source: &S,
    window: &Window,
    options: AvailabilityOptions,
) -> Result<Vec<StaffAvailability>>
where
    S: ScheduleSource + ?Sized,
{
    let schedules = source.staff_schedules(None)?;
    tracing::debug!(
        staff = schedules.len(),
        start = %window.start(),
        end = %window.end(),
        "computing availability"
    );
    Ok(roster_availability(&schedules, window, options))
}
