//! Compute free time slots inside a window from a staff member's busy intervals.
//!
//! Walks busy intervals in ascending start order with a cursor that only moves
//! forward, so nested, overlapping and touching intervals collapse into one
//! consumed region without an explicit merge step.

use chrono::{DateTime, Utc};

use crate::interval::{Interval, Window};

/// A free time slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl FreeSlot {
    fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// Find the maximal gaps in `window` not covered by any busy interval.
///
/// `busy` must be sorted ascending by start (see
/// [`ScheduleIndex::overlapping`](crate::schedule::ScheduleIndex::overlapping)).
/// Busy intervals may extend past either edge of the window; they are not
/// clipped first because the cursor already starts at the window start and the
/// trailing slot is bounded by the window end.
pub fn find_free_slots(busy: &[Interval], window: &Window) -> Vec<FreeSlot> {
    let mut free_slots = Vec::new();
    let mut cursor = window.start();

    for interval in busy {
        if interval.start() > cursor {
            free_slots.push(FreeSlot::new(cursor, interval.start().min(window.end())));
        }
        cursor = cursor.max(interval.end());
        if cursor >= window.end() {
            break;
        }
    }

    // Trailing free slot after the last busy period.
    if cursor < window.end() {
        free_slots.push(FreeSlot::new(cursor, window.end()));
    }

    free_slots
}
