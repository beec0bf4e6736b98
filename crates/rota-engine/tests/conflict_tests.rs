//! Tests for double-booking detection.

use chrono::{TimeZone, Utc};
use rota_engine::conflict::find_conflicts;
use rota_engine::Interval;

fn interval(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Interval {
    Interval::new(
        Utc.with_ymd_and_hms(2026, 2, 17, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2026, 2, 17, end_hour, end_min, 0)
            .unwrap(),
    )
    .unwrap()
}

#[test]
fn overlapping_pair_reported_once() {
    let events = vec![(1, interval(14, 0, 15, 0)), (2, interval(14, 30, 15, 30))];

    let conflicts = find_conflicts(&events);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].event_a, 1);
    assert_eq!(conflicts[0].event_b, 2);
    assert_eq!(conflicts[0].overlap_minutes, 30);
    assert_eq!(
        conflicts[0].overlap.start(),
        Utc.with_ymd_and_hms(2026, 2, 17, 14, 30, 0).unwrap()
    );
}

#[test]
fn adjacent_events_are_not_conflicts() {
    let events = vec![(1, interval(14, 0, 15, 0)), (2, interval(15, 0, 16, 0))];

    assert!(find_conflicts(&events).is_empty());
}

#[test]
fn contained_event_overlap_is_the_inner_event() {
    let events = vec![(1, interval(9, 0, 17, 0)), (2, interval(12, 0, 13, 0))];

    let conflicts = find_conflicts(&events);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].overlap_minutes, 60);
}

#[test]
fn three_way_overlap_yields_every_pair() {
    let events = vec![
        (1, interval(9, 0, 11, 0)),
        (2, interval(10, 0, 12, 0)),
        (3, interval(10, 30, 10, 45)),
    ];

    let pairs: Vec<(u64, u64)> = find_conflicts(&events)
        .iter()
        .map(|c| (c.event_a, c.event_b))
        .collect();

    assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);
}

#[test]
fn empty_interval_never_conflicts() {
    let events = vec![(1, interval(10, 0, 10, 0)), (2, interval(9, 0, 11, 0))];

    assert!(find_conflicts(&events).is_empty());
}
