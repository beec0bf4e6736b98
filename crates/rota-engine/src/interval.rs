//! Half-open time ranges and the request window type.
//!
//! An [`Interval`] covers `[start, end)`: the start instant is included, the
//! end instant is not. Two intervals that merely touch (one ends exactly when
//! the other starts) do not overlap.

use chrono::{DateTime, Utc};
use crate::error::{Result, RotaError};

/// A `[start, end)` time range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval, rejecting `start > end`.
    ///
    /// Zero-length intervals (`start == end`) are allowed; they never overlap
    /// anything.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(RotaError::MalformedInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    ///
    /// Adjacent intervals where one ends exactly when another starts are NOT
    /// overlapping, and an empty interval overlaps nothing, itself included.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The part of `self` that lies inside `other`, if they overlap.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Interval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

/// A validated availability query window: `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window(Interval);

impl Window {
    /// # Errors
    /// Returns `RotaError::InvalidWindow` when `start >= end`. The window is
    /// never silently swapped or widened.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(RotaError::InvalidWindow { start, end });
        }
        Ok(Self(Interval { start, end }))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.0.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.0.end
    }

    pub fn as_interval(&self) -> &Interval {
        &self.0
    }
}

impl TryFrom<Interval> for Window {
    type Error = RotaError;

    fn try_from(interval: Interval) -> Result<Self> {
        Window::new(interval.start, interval.end)
    }
}
