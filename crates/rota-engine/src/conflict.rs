//! Detect double bookings within one staff member's schedule.
//!
//! The availability engine reports overlapping commitments verbatim and leaves
//! conflicts to the caller; this module is that caller-side check. Adjacent
//! events (where one ends exactly when another starts) are NOT conflicts.

use crate::interval::Interval;
use crate::model::EventId;

/// A detected overlap between two events assigned to the same person.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub event_a: EventId,
    pub event_b: EventId,
    pub overlap: Interval,
    pub overlap_minutes: i64,
}

/// Find all pairwise overlaps among `events`.
///
/// Each unordered pair is reported once, with `event_a` being the one that
/// appears first in the input. The overlap is
/// `[max(a.start, b.start), min(a.end, b.end))`.
pub fn find_conflicts(events: &[(EventId, Interval)]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, (id_a, a)) in events.iter().enumerate() {
        for (id_b, b) in &events[i + 1..] {
            if let Some(overlap) = a.intersection(b) {
                conflicts.push(Conflict {
                    event_a: *id_a,
                    event_b: *id_b,
                    overlap,
                    overlap_minutes: overlap.duration_minutes(),
                });
            }
        }
    }

    conflicts
}
