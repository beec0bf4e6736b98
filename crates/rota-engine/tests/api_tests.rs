//! Tests for the boundary layer: input validation and JSON response shapes.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rota_engine::api::{
    parse_window, query_availability, search_events, staff_conflicts, EventQuery, Presenter,
};
use rota_engine::error::RotaError;
use rota_engine::model::{EventDraft, EventType, StaffDraft};
use rota_engine::{AvailabilityOptions, EventStatus, InMemoryStore};
use serde_json::json;

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn store() -> InMemoryStore {
    let mut store = InMemoryStore::new();
    for (name, designation) in [("Alice", "Nurse"), ("Bob", "Surgeon")] {
        store
            .create_staff(StaffDraft {
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
                designation: designation.into(),
            })
            .unwrap();
    }
    store
        .create_event(EventDraft {
            title: "Theatre list".into(),
            description: Some("Elective orthopaedics".into()),
            event_type: EventType::Regular,
            start: at(13, 0),
            end: at(17, 0),
            staff_ids: vec![2],
        })
        .unwrap();
    store
        .create_event(EventDraft {
            title: "Ward round".into(),
            description: None,
            event_type: EventType::Regular,
            start: at(9, 30),
            end: at(10, 30),
            staff_ids: vec![1, 2],
        })
        .unwrap();
    store
        .create_event(EventDraft {
            title: "Handover".into(),
            description: None,
            event_type: EventType::Regular,
            start: at(10, 0),
            end: at(11, 0),
            staff_ids: vec![2],
        })
        .unwrap();
    store
}

// ---------------------------------------------------------------------------
// Window parsing
// ---------------------------------------------------------------------------

#[test]
fn missing_bounds_are_reported_by_name() {
    let err = parse_window(None, Some("2026-03-16T10:00:00Z"), Tz::UTC).unwrap_err();
    assert!(matches!(err, RotaError::MissingParameter("start")));

    let err = parse_window(Some("2026-03-16T10:00:00Z"), Some("  "), Tz::UTC).unwrap_err();
    assert!(matches!(err, RotaError::MissingParameter("end")));
}

#[test]
fn malformed_bound_is_invalid_datetime() {
    let err = parse_window(Some("soon"), Some("2026-03-16T10:00:00Z"), Tz::UTC).unwrap_err();
    assert!(matches!(err, RotaError::InvalidDatetime(_)));
    assert!(err.is_client_error());
}

#[test]
fn equal_bounds_are_an_invalid_window() {
    let err = parse_window(
        Some("2026-03-16T10:00:00Z"),
        Some("2026-03-16T10:00:00Z"),
        Tz::UTC,
    )
    .unwrap_err();
    assert!(matches!(err, RotaError::InvalidWindow { .. }));
}

// ---------------------------------------------------------------------------
// Availability response
// ---------------------------------------------------------------------------

#[test]
fn availability_json_shape_with_slots() {
    let entries = query_availability(
        &store(),
        Some("2026-03-16T09:00:00Z"),
        Some("2026-03-16T12:00:00Z"),
        AvailabilityOptions {
            include_free_slots: true,
        },
        &Presenter::utc(),
    )
    .unwrap();

    let value = serde_json::to_value(&entries).unwrap();
    assert_eq!(
        value,
        json!([
            {
                "id": 1,
                "name": "Alice",
                "isBusy": true,
                "nextAvailable": "2026-03-16T10:30:00Z",
                "freeSlots": [
                    {"start": "2026-03-16T09:00:00Z", "end": "2026-03-16T09:30:00Z", "durationMinutes": 30},
                    {"start": "2026-03-16T10:30:00Z", "end": "2026-03-16T12:00:00Z", "durationMinutes": 90}
                ]
            },
            {
                "id": 2,
                "name": "Bob",
                "isBusy": true,
                "nextAvailable": "2026-03-16T11:00:00Z",
                "freeSlots": [
                    {"start": "2026-03-16T09:00:00Z", "end": "2026-03-16T09:30:00Z", "durationMinutes": 30},
                    {"start": "2026-03-16T11:00:00Z", "end": "2026-03-16T12:00:00Z", "durationMinutes": 60}
                ]
            }
        ])
    );
}

#[test]
fn availability_omits_slots_by_default() {
    let entries = query_availability(
        &store(),
        Some("2026-03-16T07:00:00Z"),
        Some("2026-03-16T08:00:00Z"),
        AvailabilityOptions::default(),
        &Presenter::utc(),
    )
    .unwrap();

    let value = serde_json::to_value(&entries).unwrap();
    assert_eq!(
        value[0],
        json!({"id": 1, "name": "Alice", "isBusy": false, "nextAvailable": "2026-03-16T07:00:00Z"})
    );
}

#[test]
fn availability_renders_in_display_zone() {
    // Window given as Brisbane wall-clock time: 19:00-21:00 local = 09:00-11:00 UTC.
    let presenter = Presenter::new(Tz::Australia__Brisbane);
    let entries = query_availability(
        &store(),
        Some("2026-03-16T19:00"),
        Some("2026-03-16T21:00"),
        AvailabilityOptions::default(),
        &presenter,
    )
    .unwrap();

    assert_eq!(entries[0].next_available, "2026-03-16T20:30:00+10:00");
}

#[test]
fn repeated_queries_are_byte_identical() {
    let store = store();
    let run = || {
        let entries = query_availability(
            &store,
            Some("2026-03-16T08:00:00Z"),
            Some("2026-03-16T18:00:00Z"),
            AvailabilityOptions {
                include_free_slots: true,
            },
            &Presenter::utc(),
        )
        .unwrap();
        serde_json::to_string(&entries).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn empty_roster_is_an_empty_array() {
    let entries = query_availability(
        &InMemoryStore::new(),
        Some("2026-03-16T08:00:00Z"),
        Some("2026-03-16T18:00:00Z"),
        AvailabilityOptions::default(),
        &Presenter::utc(),
    )
    .unwrap();
    assert_eq!(serde_json::to_string(&entries).unwrap(), "[]");
}

// ---------------------------------------------------------------------------
// Event views and search
// ---------------------------------------------------------------------------

#[test]
fn event_view_includes_assignees_and_status() {
    let store = store();
    let event = store.get_event(2).unwrap();
    let view = Presenter::utc().event(&store, event, at(10, 0)).unwrap();

    let value = serde_json::to_value(&view).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 2,
            "title": "Ward round",
            "eventType": "regular",
            "start": "2026-03-16T09:30:00Z",
            "end": "2026-03-16T10:30:00Z",
            "status": "ongoing",
            "assignedTo": [
                {"staffId": 1, "staff": {"name": "Alice", "email": "alice@example.com", "designation": "Nurse"}},
                {"staffId": 2, "staff": {"name": "Bob", "email": "bob@example.com", "designation": "Surgeon"}}
            ]
        })
    );
}

#[test]
fn search_without_filters_sorts_by_start() {
    let store = store();
    let views = search_events(&store, &EventQuery::default(), at(8, 0), &Presenter::utc()).unwrap();

    let titles: Vec<&str> = views.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["Ward round", "Handover", "Theatre list"]);
    assert!(views.iter().all(|v| v.status == EventStatus::Upcoming));
}

#[test]
fn search_matches_description_case_insensitively() {
    let store = store();
    let query = EventQuery {
        text: Some("ORTHO".into()),
        range: None,
    };
    let views = search_events(&store, &query, at(8, 0), &Presenter::utc()).unwrap();

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].title, "Theatre list");
}

#[test]
fn search_matches_assignee_designation() {
    let store = store();
    let query = EventQuery {
        text: Some("nurse".into()),
        range: None,
    };
    let views = search_events(&store, &query, at(8, 0), &Presenter::utc()).unwrap();

    let ids: Vec<u64> = views.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn search_by_range_uses_half_open_overlap() {
    let store = store();
    let query = EventQuery {
        text: None,
        range: Some(rota_engine::Window::new(at(10, 30), at(13, 0)).unwrap()),
    };
    let views = search_events(&store, &query, at(8, 0), &Presenter::utc()).unwrap();

    // Ward round ends at 10:30 and Theatre list starts at 13:00: both only touch.
    let titles: Vec<&str> = views.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["Handover"]);
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

#[test]
fn conflicts_report_double_bookings() {
    let store = store();
    let conflicts = staff_conflicts(&store, 2, &Presenter::utc()).unwrap();

    assert_eq!(conflicts.len(), 1);
    assert_eq!((conflicts[0].event_a, conflicts[0].event_b), (2, 3));
    assert_eq!(conflicts[0].start, "2026-03-16T10:00:00Z");
    assert_eq!(conflicts[0].end, "2026-03-16T10:30:00Z");
    assert_eq!(conflicts[0].overlap_minutes, 30);

    assert!(staff_conflicts(&store, 1, &Presenter::utc()).unwrap().is_empty());
}

#[test]
fn conflicts_for_unknown_staff_is_not_found() {
    let err = staff_conflicts(&store(), 9, &Presenter::utc()).unwrap_err();
    assert!(matches!(err, RotaError::StaffNotFound(9)));
}
