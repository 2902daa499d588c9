// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn granted() -> Event {
    Event::AdmissionGranted {
        resource: "platform".to_string(),
        requester: RequesterId::new("passenger"),
        ticket: Ticket(1),
    }
}

#[parameterized(
    admission_granted = { granted(), "admission:granted" },
    queued = {
        Event::AdmissionQueued {
            resource: "platform".to_string(),
            requester: RequesterId::new("freight"),
            position: 1,
        },
        "admission:queued"
    },
    handoff = {
        Event::SlotHandedOff {
            resource: "platform".to_string(),
            from: RequesterId::new("passenger"),
            to: RequesterId::new("freight"),
            ticket: Ticket(2),
        },
        "slot:handoff"
    },
    ignored = {
        Event::ReleaseIgnored { resource: "platform".to_string() },
        "slot:release:ignored"
    },
)]
fn event_names(event: Event, expected: &str) {
    assert_eq!(event.name(), expected);
    assert_eq!(event.resource(), "platform");
}

#[test]
fn events_serialize_with_tag() {
    let json = serde_json::to_value(granted()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "event": "admission_granted",
            "resource": "platform",
            "requester": "passenger",
            "ticket": 1,
        })
    );
}

#[test]
fn events_round_trip_through_json() {
    let event = Event::ReleaseRefused {
        resource: "platform".to_string(),
        holder: RequesterId::new("passenger"),
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
