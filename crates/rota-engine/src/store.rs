//! In-memory event store: staff, events and the assignments between them.
//!
//! Ordered maps keep every listing deterministic (by id). Deletes cascade so
//! that no assignment outlives its staff member or its event. The whole store
//! round-trips through a JSON [`Snapshot`] for persistence.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::availability::{ScheduleSource, StaffSchedule};
use crate::error::{Result, RotaError};
use crate::model::{
    Assignment, Event, EventDraft, EventId, StaffDraft, StaffId, StaffMember,
};
use crate::status::StatusState;

#[derive(Debug, Clone)]
pub struct InMemoryStore {
    staff: BTreeMap<StaffId, StaffMember>,
    events: BTreeMap<EventId, Event>,
    assignments: BTreeSet<Assignment>,
    next_staff_id: StaffId,
    next_event_id: EventId,
}

/// Serialized form of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub next_staff_id: StaffId,
    #[serde(default)]
    pub next_event_id: EventId,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            staff: BTreeMap::new(),
            events: BTreeMap::new(),
            assignments: BTreeSet::new(),
            next_staff_id: 1,
            next_event_id: 1,
        }
    }

    // -----------------------------------------------------------------------
    // Staff
    // -----------------------------------------------------------------------

    pub fn create_staff(&mut self, draft: StaffDraft) -> Result<StaffMember> {
        draft.validate()?;
        let now = Utc::now();
        let id = allocate_id(&mut self.next_staff_id, "staff")?;

        let member = StaffMember {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            designation: draft.designation.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.staff.insert(id, member.clone());
        tracing::debug!(staff_id = id, "created staff member");
        Ok(member)
    }

    pub fn list_staff(&self) -> Vec<&StaffMember> {
        self.staff.values().collect()
    }

    pub fn get_staff(&self, id: StaffId) -> Result<&StaffMember> {
        self.staff.get(&id).ok_or(RotaError::StaffNotFound(id))
    }

    pub fn update_staff(&mut self, id: StaffId, draft: StaffDraft) -> Result<StaffMember> {
        draft.validate()?;
        let member = self.staff.get_mut(&id).ok_or(RotaError::StaffNotFound(id))?;
        member.name = draft.name.trim().to_string();
        member.email = draft.email.trim().to_string();
        member.designation = draft.designation.trim().to_string();
        member.updated_at = Utc::now();
        tracing::debug!(staff_id = id, "updated staff member");
        Ok(member.clone())
    }

    /// Remove a staff member together with all of their assignments.
    pub fn delete_staff(&mut self, id: StaffId) -> Result<StaffMember> {
        if !self.staff.contains_key(&id) {
            return Err(RotaError::StaffNotFound(id));
        }
        let before = self.assignments.len();
        self.assignments.retain(|a| a.staff_id != id);
        let removed = before - self.assignments.len();

        let member = self.staff.remove(&id).ok_or(RotaError::StaffNotFound(id))?;
        tracing::debug!(staff_id = id, assignments = removed, "deleted staff member");
        Ok(member)
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Create an event and its initial assignments. Nothing is written if any
    /// referenced staff member does not exist.
    pub fn create_event(&mut self, draft: EventDraft) -> Result<Event> {
        draft.validate()?;
        self.check_staff_exist(&draft.staff_ids)?;

        let now = Utc::now();
        let id = allocate_id(&mut self.next_event_id, "event")?;

        let event = Event {
            id,
            title: draft.title.trim().to_string(),
            description: normalize_description(draft.description),
            event_type: draft.event_type,
            start: draft.start,
            end: draft.end,
            status: StatusState::Derived,
            created_at: now,
            updated_at: now,
        };
        self.events.insert(id, event.clone());
        for staff_id in draft.staff_ids {
            self.assignments.insert(Assignment {
                event_id: id,
                staff_id,
            });
        }
        tracing::debug!(event_id = id, "created event");
        Ok(event)
    }

    pub fn list_events(&self) -> Vec<&Event> {
        self.events.values().collect()
    }

    pub fn get_event(&self, id: EventId) -> Result<&Event> {
        self.events.get(&id).ok_or(RotaError::EventNotFound(id))
    }

    /// Replace an event's fields and its full assignee list.
    ///
    /// A manually completed status survives the update.
    pub fn update_event(&mut self, id: EventId, draft: EventDraft) -> Result<Event> {
        draft.validate()?;
        if !self.events.contains_key(&id) {
            return Err(RotaError::EventNotFound(id));
        }
        self.check_staff_exist(&draft.staff_ids)?;

        self.assignments.retain(|a| a.event_id != id);
        for staff_id in &draft.staff_ids {
            self.assignments.insert(Assignment {
                event_id: id,
                staff_id: *staff_id,
            });
        }

        let event = self.events.get_mut(&id).ok_or(RotaError::EventNotFound(id))?;
        event.title = draft.title.trim().to_string();
        event.description = normalize_description(draft.description);
        event.event_type = draft.event_type;
        event.start = draft.start;
        event.end = draft.end;
        event.updated_at = Utc::now();
        tracing::debug!(event_id = id, "updated event");
        Ok(event.clone())
    }

    /// Remove an event together with all of its assignments.
    pub fn delete_event(&mut self, id: EventId) -> Result<Event> {
        let event = self.events.remove(&id).ok_or(RotaError::EventNotFound(id))?;
        self.assignments.retain(|a| a.event_id != id);
        tracing::debug!(event_id = id, "deleted event");
        Ok(event)
    }

    /// Pin an event to completed. Completing twice is a no-op.
    pub fn complete_event(&mut self, id: EventId) -> Result<Event> {
        let event = self.events.get_mut(&id).ok_or(RotaError::EventNotFound(id))?;
        if event.status.complete() {
            event.updated_at = Utc::now();
            tracing::debug!(event_id = id, "event marked completed");
        }
        Ok(event.clone())
    }

    // -----------------------------------------------------------------------
    // Assignments
    // -----------------------------------------------------------------------

    pub fn assign(&mut self, event_id: EventId, staff_id: StaffId) -> Result<Assignment> {
        self.get_event(event_id)?;
        self.get_staff(staff_id)?;
        let assignment = Assignment { event_id, staff_id };
        if !self.assignments.insert(assignment) {
            return Err(RotaError::DuplicateAssignment { event_id, staff_id });
        }
        tracing::debug!(event_id, staff_id, "assigned staff member");
        Ok(assignment)
    }

    /// Remove one staff member from an event. Returns how many assignments
    /// were removed (0 or 1).
    pub fn unassign(&mut self, event_id: EventId, staff_id: StaffId) -> Result<usize> {
        self.get_event(event_id)?;
        let removed = usize::from(self.assignments.remove(&Assignment { event_id, staff_id }));
        tracing::debug!(event_id, staff_id, removed, "unassigned staff member");
        Ok(removed)
    }

    /// Staff assigned to an event, ordered by staff id.
    pub fn assignees(&self, event_id: EventId) -> Result<Vec<&StaffMember>> {
        self.get_event(event_id)?;
        let first = Assignment {
            event_id,
            staff_id: StaffId::MIN,
        };
        let last = Assignment {
            event_id,
            staff_id: StaffId::MAX,
        };
        Ok(self
            .assignments
            .range(first..=last)
            .filter_map(|a| self.staff.get(&a.staff_id))
            .collect())
    }

    /// Events a staff member is assigned to, ordered by event id.
    pub fn events_for_staff(&self, staff_id: StaffId) -> Result<Vec<&Event>> {
        self.get_staff(staff_id)?;
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.staff_id == staff_id)
            .filter_map(|a| self.events.get(&a.event_id))
            .collect())
    }

    fn check_staff_exist(&self, ids: &[StaffId]) -> Result<()> {
        match ids.iter().find(|id| !self.staff.contains_key(id)) {
            Some(missing) => Err(RotaError::StaffNotFound(*missing)),
            None => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            next_staff_id: self.next_staff_id,
            next_event_id: self.next_event_id,
            staff: self.staff.values().cloned().collect(),
            events: self.events.values().cloned().collect(),
            assignments: self.assignments.iter().copied().collect(),
        }
    }

    /// Rebuild a store from a snapshot.
    ///
    /// Assignments that reference a missing staff member or event are dropped
    /// with a warning. Id counters are bumped past the largest id in use; a
    /// stored id of `u64::MAX` leaves no room and is rejected.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let staff: BTreeMap<StaffId, StaffMember> =
            snapshot.staff.into_iter().map(|s| (s.id, s)).collect();
        let events: BTreeMap<EventId, Event> =
            snapshot.events.into_iter().map(|e| (e.id, e)).collect();

        let assignments = snapshot
            .assignments
            .into_iter()
            .filter(|a| {
                let valid = staff.contains_key(&a.staff_id) && events.contains_key(&a.event_id);
                if !valid {
                    tracing::warn!(
                        event_id = a.event_id,
                        staff_id = a.staff_id,
                        "dropping dangling assignment from snapshot"
                    );
                }
                valid
            })
            .collect();

        let next_staff_id = next_free_id(staff.keys().next_back(), "staff")?
            .max(snapshot.next_staff_id);
        let next_event_id = next_free_id(events.keys().next_back(), "event")?
            .max(snapshot.next_event_id);

        Ok(Self {
            staff,
            events,
            assignments,
            next_staff_id,
            next_event_id,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }
}

/// Hand out the counter's current value and advance it.
fn allocate_id(counter: &mut u64, kind: &str) -> Result<u64> {
    let id = *counter;
    *counter = id
        .checked_add(1)
        .ok_or_else(|| RotaError::Validation(format!("no {kind} ids left to allocate")))?;
    Ok(id)
}

/// The first id after the largest one in use, or 1 for an empty map.
fn next_free_id(largest: Option<&u64>, kind: &str) -> Result<u64> {
    match largest {
        None => Ok(1),
        Some(&max) => max.checked_add(1).ok_or_else(|| {
            RotaError::Validation(format!("{kind} id {max} leaves no room for new ids"))
        }),
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

impl ScheduleSource for InMemoryStore {
    fn staff_schedules(&self, staff: Option<&[StaffId]>) -> Result<Vec<StaffSchedule>> {
        let selected: Vec<&StaffMember> = match staff {
            None => self.staff.values().collect(),
            Some(ids) => {
                let unique: BTreeSet<StaffId> = ids.iter().copied().collect();
                unique
                    .into_iter()
                    .map(|id| self.get_staff(id))
                    .collect::<Result<_>>()?
            }
        };

        let mut spans_by_staff: BTreeMap<StaffId, Vec<_>> = BTreeMap::new();
        for assignment in &self.assignments {
            if let Some(event) = self.events.get(&assignment.event_id) {
                spans_by_staff
                    .entry(assignment.staff_id)
                    .or_default()
                    .push(event.span());
            }
        }

        Ok(selected
            .into_iter()
            .map(|member| StaffSchedule {
                id: member.id,
                name: member.name.clone(),
                spans: spans_by_staff.remove(&member.id).unwrap_or_default(),
            })
            .collect())
    }
}
