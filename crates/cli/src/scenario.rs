// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted station scenarios
//!
//! ```toml
//! [station]
//! name = "platform-1"
//! release_policy = "open"
//!
//! [[step]]
//! action = "arrive"
//! train = "passenger"
//!
//! [[step]]
//! action = "depart"
//! train = "passenger"
//! ```

use crate::railway::Station;
use serde::Deserialize;
use station_core::{AdmissionConfig, AdmissionError, ConfigError};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{train} cannot depart: it is not on the platform")]
    NotAdmitted { train: String },
    #[error(transparent)]
    Admission(#[from] AdmissionError),
}

/// A single scripted action
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Train asks for the platform
    Arrive { train: String },
    /// Train on the platform leaves with its ticket
    Depart { train: String },
    /// Platform is freed without a ticket
    Release,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub station: AdmissionConfig,
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Passenger train on the platform, freight train waiting
    pub fn railway_demo() -> Self {
        let arrive = |train: &str| Step::Arrive {
            train: train.to_string(),
        };
        let depart = |train: &str| Step::Depart {
            train: train.to_string(),
        };
        Self {
            station: AdmissionConfig::default(),
            steps: vec![
                arrive("passenger"),
                arrive("freight"),
                depart("passenger"),
                depart("freight"),
            ],
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(content)?;
        scenario.station.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Play every step against a fresh station
    pub fn run(&self) -> Result<Station, ScenarioError> {
        let station = Station::new(self.station.clone());
        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(step = index + 1, ?step, "running step");
            match step {
                Step::Arrive { train } => {
                    station.arrive(train);
                }
                Step::Depart { train } => {
                    station.depart(train)?;
                }
                Step::Release => {
                    station.release();
                }
            }
        }
        Ok(station)
    }
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod tests;
