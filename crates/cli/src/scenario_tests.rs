// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::railway::TraceEntry;
use station_core::{ReleasePolicy, RequesterId, Ticket};
use yare::parameterized;

#[test]
fn parses_station_and_steps() {
    let scenario = Scenario::from_toml_str(
        r#"
        [station]
        name = "platform-2"
        release_policy = "holder"

        [[step]]
        action = "arrive"
        train = "passenger"

        [[step]]
        action = "release"

        [[step]]
        action = "depart"
        train = "passenger"
        "#,
    )
    .unwrap();

    assert_eq!(scenario.station.name, "platform-2");
    assert_eq!(scenario.station.release_policy, ReleasePolicy::Holder);
    assert_eq!(
        scenario.steps,
        vec![
            Step::Arrive {
                train: "passenger".to_string()
            },
            Step::Release,
            Step::Depart {
                train: "passenger".to_string()
            },
        ]
    );
}

#[test]
fn station_table_is_optional() {
    let scenario = Scenario::from_toml_str(
        r#"
        [[step]]
        action = "arrive"
        train = "a"
        "#,
    )
    .unwrap();

    assert_eq!(scenario.station, AdmissionConfig::default());
    assert_eq!(scenario.steps.len(), 1);
}

#[parameterized(
    unknown_action = { "[[step]]\naction = \"teleport\"\ntrain = \"a\"" },
    missing_train = { "[[step]]\naction = \"arrive\"" },
    unknown_field = { "[[step]]\naction = \"arrive\"\ntrain = \"a\"\nspeed = 3" },
    unknown_table = { "[depot]\nname = \"x\"" },
)]
fn rejects_malformed_scenarios(content: &str) {
    let err = Scenario::from_toml_str(content).unwrap_err();
    assert!(matches!(err, ScenarioError::Toml(_)), "got {:?}", err);
}

#[test]
fn rejects_blank_station_name() {
    let err = Scenario::from_toml_str("[station]\nname = \" \"").unwrap_err();
    assert!(matches!(err, ScenarioError::Config(_)));
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = Scenario::load(&path).unwrap_err();

    assert!(matches!(err, ScenarioError::Io { .. }));
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn railway_demo_trace() {
    let station = Scenario::railway_demo().run().unwrap();

    assert_eq!(
        station.trace(),
        vec![
            TraceEntry::Arrived {
                train: RequesterId::new("passenger"),
                ticket: Ticket(1)
            },
            TraceEntry::Waiting {
                train: RequesterId::new("freight"),
                position: 1
            },
            TraceEntry::Leaving {
                train: RequesterId::new("passenger")
            },
            TraceEntry::Arrived {
                train: RequesterId::new("freight"),
                ticket: Ticket(2)
            },
            TraceEntry::Leaving {
                train: RequesterId::new("freight")
            },
            TraceEntry::PlatformFree {
                platform: "platform".to_string()
            },
        ]
    );
}

#[test]
fn departing_train_must_be_on_platform() {
    let scenario = Scenario::from_toml_str(
        r#"
        [[step]]
        action = "arrive"
        train = "passenger"

        [[step]]
        action = "arrive"
        train = "freight"

        [[step]]
        action = "depart"
        train = "freight"
        "#,
    )
    .unwrap();

    let err = scenario.run().err().unwrap();

    assert!(matches!(err, ScenarioError::NotAdmitted { ref train } if train == "freight"));
}

#[test]
fn anonymous_release_refused_under_holder_policy() {
    let scenario = Scenario::from_toml_str(
        r#"
        [station]
        release_policy = "holder"

        [[step]]
        action = "arrive"
        train = "passenger"

        [[step]]
        action = "release"
        "#,
    );
    // name is required in an explicit station table
    assert!(scenario.is_err());

    let scenario = Scenario {
        station: AdmissionConfig::new("platform").with_release_policy(ReleasePolicy::Holder),
        steps: vec![
            Step::Arrive {
                train: "passenger".to_string(),
            },
            Step::Release,
        ],
    };
    let station = scenario.run().unwrap();

    assert_eq!(
        station.trace().last(),
        Some(&TraceEntry::ReleaseRefused {
            platform: "platform".to_string(),
            holder: RequesterId::new("passenger"),
        })
    );
}
