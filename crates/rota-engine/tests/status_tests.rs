//! Tests for derived and manually completed event status.

use chrono::{DateTime, TimeZone, Utc};
use rota_engine::model::{EventDraft, EventType};
use rota_engine::{EventStatus, InMemoryStore, StatusState};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, 0, 0).unwrap()
}

fn draft(start: u32, end: u32) -> EventDraft {
    EventDraft {
        title: "Stand-up".into(),
        description: None,
        event_type: EventType::Regular,
        start: at(start),
        end: at(end),
        staff_ids: vec![],
    }
}

#[test]
fn derived_status_follows_the_clock() {
    let state = StatusState::Derived;
    assert_eq!(state.resolve(at(9), at(10), at(8)), EventStatus::Upcoming);
    assert_eq!(state.resolve(at(9), at(10), at(9)), EventStatus::Ongoing);
    assert_eq!(state.resolve(at(9), at(10), at(10)), EventStatus::Completed);
}

#[test]
fn complete_reports_change_only_once() {
    let mut state = StatusState::Derived;
    assert!(state.complete());
    assert!(!state.complete());
    assert_eq!(state, StatusState::ManuallyCompleted);
}

#[test]
fn manually_completed_wins_before_the_event_starts() {
    let mut store = InMemoryStore::new();
    let event = store.create_event(draft(9, 10)).unwrap();

    assert_eq!(event.status_at(at(8)), EventStatus::Upcoming);

    let completed = store.complete_event(event.id).unwrap();
    assert_eq!(completed.status_at(at(8)), EventStatus::Completed);
}

#[test]
fn completed_status_survives_rescheduling() {
    let mut store = InMemoryStore::new();
    let event = store.create_event(draft(9, 10)).unwrap();
    store.complete_event(event.id).unwrap();

    // Move the event into the future: a derived status would say upcoming.
    let updated = store.update_event(event.id, draft(20, 21)).unwrap();

    assert_eq!(updated.status, StatusState::ManuallyCompleted);
    assert_eq!(updated.status_at(at(8)), EventStatus::Completed);
}

#[test]
fn status_serializes_as_lowercase() {
    assert_eq!(
        serde_json::to_string(&EventStatus::Ongoing).unwrap(),
        "\"ongoing\""
    );
    assert_eq!(
        serde_json::to_string(&StatusState::ManuallyCompleted).unwrap(),
        "\"manuallyCompleted\""
    );
}
