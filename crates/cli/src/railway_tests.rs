// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn station() -> Station {
    Station::new(AdmissionConfig::new("platform"))
}

fn lines(station: &Station) -> Vec<String> {
    station.trace().iter().map(|e| e.to_string()).collect()
}

#[test]
fn text_trace_reads_like_a_timetable() {
    let station = station();
    station.arrive("passenger");
    station.arrive("freight");
    station.depart("passenger").unwrap();
    station.depart("freight").unwrap();

    assert_eq!(
        lines(&station),
        vec![
            "passenger: arrived (ticket #1)",
            "freight: arrival blocked, waiting (position 1)",
            "passenger: leaving",
            "freight: arrived (ticket #2)",
            "freight: leaving",
            "platform: free",
        ]
    );
}

#[test]
fn repeated_arrival_is_noted_once() {
    let station = station();
    station.arrive("passenger");
    station.arrive("freight");

    assert_eq!(
        station.arrive("freight"),
        GrantResult::Queued { position: 1 }
    );
    assert_eq!(
        station.trace().last(),
        Some(&TraceEntry::AlreadyHere {
            train: RequesterId::new("freight")
        })
    );
    assert_eq!(station.snapshot().waiting, vec![RequesterId::new("freight")]);
}

#[test]
fn anonymous_release_hands_platform_on() {
    let station = station();
    station.arrive("passenger");
    station.arrive("freight");

    let outcome = station.release();

    assert!(matches!(outcome, ReleaseOutcome::HandedOff { .. }));
    // The forced-out train no longer holds a ticket
    assert!(matches!(
        station.depart("passenger"),
        Err(ScenarioError::NotAdmitted { .. })
    ));
    assert_eq!(station.depart("freight").unwrap(), ReleaseOutcome::Freed);
}

#[test]
fn release_of_empty_platform_is_ignored() {
    let station = station();

    assert_eq!(station.release(), ReleaseOutcome::AlreadyFree);
    assert_eq!(
        lines(&station),
        vec!["platform: release requested", "platform: already free, release ignored"]
    );
}

#[test]
fn events_are_collected_from_the_bus() {
    let station = station();
    station.arrive("passenger");
    station.arrive("freight");
    station.depart("passenger").unwrap();

    let events: Vec<String> = station
        .drain_events()
        .iter()
        .map(|e| e.to_string())
        .collect();

    assert_eq!(
        events,
        vec![
            "admission:granted platform passenger #1",
            "admission:queued platform freight position=1",
            "slot:handoff platform passenger -> freight #2",
            "admission:granted platform freight #2",
        ]
    );
    assert!(station.drain_events().is_empty());
}

#[test]
fn trace_serializes_with_action_tag() {
    let station = station();
    station.arrive("passenger");

    let json = serde_json::to_value(station.trace()).unwrap();

    assert_eq!(
        json,
        serde_json::json!([
            { "action": "arrived", "train": "passenger", "ticket": 1 }
        ])
    );
}
