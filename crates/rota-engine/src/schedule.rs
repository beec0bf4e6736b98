//! Per-staff projection of assigned events into intervals.
//!
//! A [`ScheduleIndex`] is built fresh for every query from the raw spans the
//! event store hands out. It is read-only: overlap queries never reorder or
//! merge the stored intervals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::{Interval, Window};

/// A raw `(start, end)` pair as stored for an event. Unlike [`Interval`] it may
/// be malformed (`start > end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    intervals: Vec<Interval>,
}

impl ScheduleIndex {
    /// Build an index from raw spans, in the order given.
    ///
    /// Spans with `start > end` can never overlap anything under the strict
    /// overlap rule and would poison `next_available`; they are dropped with a
    /// warning.
    pub fn from_spans<I>(spans: I) -> Self
    where
        I: IntoIterator<Item = Span>,
    {
        let intervals = spans
            .into_iter()
            .filter_map(|span| match Interval::new(span.start, span.end) {
                Ok(interval) => Some(interval),
                Err(e) => {
                    tracing::warn!("excluding span from schedule: {e}");
                    None
                }
            })
            .collect();
        Self { intervals }
    }

    pub fn from_intervals(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Intervals overlapping `window`, sorted ascending by start.
    ///
    /// The sort is stable, so intervals with equal starts keep their input
    /// order. Double bookings are returned verbatim.
    pub fn overlapping(&self, window: &Window) -> Vec<Interval> {
        let mut hits: Vec<Interval> = self
            .intervals
            .iter()
            .filter(|interval| interval.overlaps(window.as_interval()))
            .copied()
            .collect();
        hits.sort_by_key(|interval| interval.start());
        hits
    }
}
