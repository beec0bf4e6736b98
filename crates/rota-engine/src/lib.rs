//! # rota-engine
//!
//! Staff rostering core: who is assigned to what, and who is free when.
//!
//! The heart of the crate is the availability computation. Given each staff
//! member's assigned events and a requested window `[start, end)`, it reports
//! whether they are busy, when they are next available, and which free slots
//! remain. Around it sit the event/staff domain model, an in-memory store with
//! cascading deletes, and the boundary layer that parses input and shapes
//! JSON output.
//!
//! ## Modules
//!
//! - [`interval`] — Half-open `[start, end)` ranges and the validated query window
//! - [`schedule`] — Per-staff index of commitments, queried by overlap
//! - [`availability`] — Busy flag, next-available instant and free slots per staff member
//! - [`freebusy`] — Gap walk producing free slots inside a window
//! - [`conflict`] — Double-booking detection within one schedule
//! - [`status`] — Derived vs. manually completed event status
//! - [`model`] — Staff, events and assignments
//! - [`store`] — In-memory event store with JSON snapshots
//! - [`timezone`] — IANA timezone parsing and rendering at the boundary
//! - [`api`] — Request parsing and response DTOs
//! - [`error`] — Error types

pub mod api;
pub mod availability;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod interval;
pub mod model;
pub mod schedule;
pub mod status;
pub mod store;
pub mod timezone;

pub use availability::{
    compute_availability, roster_availability, staff_availability, AvailabilityOptions,
    ScheduleSource, StaffAvailability, StaffSchedule,
};
pub use conflict::find_conflicts;
pub use error::RotaError;
pub use freebusy::find_free_slots;
pub use interval::{Interval, Window};
pub use schedule::{ScheduleIndex, Span};
pub use status::{EventStatus, StatusState};
pub use store::InMemoryStore;
