// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Railway station: trains competing for one platform
//!
//! Each train is a `Requester`. The station records a human-readable trace
//! of arrivals and departures and keeps the ticket of the train on the
//! platform so departures use the checked release.

use crate::scenario::ScenarioError;
use serde::Serialize;
use station_core::{
    Admission, AdmissionConfig, AdmissionCoordinator, Event, EventBus, EventReceiver,
    GrantResult, ReleaseOutcome, Requester, RequesterId, SlotSnapshot, Subscription, Ticket,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// One line of the station trace
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TraceEntry {
    Arrived { train: RequesterId, ticket: Ticket },
    Waiting { train: RequesterId, position: usize },
    AlreadyHere { train: RequesterId },
    Leaving { train: RequesterId },
    ReleaseRequested { platform: String },
    PlatformFree { platform: String },
    ReleaseIgnored { platform: String },
    ReleaseRefused { platform: String, holder: RequesterId },
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEntry::Arrived { train, ticket } => {
                write!(f, "{}: arrived (ticket {})", train, ticket)
            }
            TraceEntry::Waiting { train, position } => {
                write!(f, "{}: arrival blocked, waiting (position {})", train, position)
            }
            TraceEntry::AlreadyHere { train } => write!(f, "{}: already at the station", train),
            TraceEntry::Leaving { train } => write!(f, "{}: leaving", train),
            TraceEntry::ReleaseRequested { platform } => {
                write!(f, "{}: release requested", platform)
            }
            TraceEntry::PlatformFree { platform } => write!(f, "{}: free", platform),
            TraceEntry::ReleaseIgnored { platform } => {
                write!(f, "{}: already free, release ignored", platform)
            }
            TraceEntry::ReleaseRefused { platform, holder } => {
                write!(f, "{}: release refused, held by {}", platform, holder)
            }
        }
    }
}

/// Published event rendered as one line
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventLine(pub Event);

impl std::fmt::Display for EventLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let event = &self.0;
        write!(f, "{} {}", event.name(), event.resource())?;
        match event {
            Event::AdmissionGranted {
                requester, ticket, ..
            } => write!(f, " {} {}", requester, ticket),
            Event::AdmissionQueued {
                requester,
                position,
                ..
            } => write!(f, " {} position={}", requester, position),
            Event::AdmissionDuplicate { requester, .. } => write!(f, " {}", requester),
            Event::SlotReleased { holder, ticket, .. } => write!(f, " {} {}", holder, ticket),
            Event::SlotHandedOff {
                from, to, ticket, ..
            } => write!(f, " {} -> {} {}", from, to, ticket),
            Event::ReleaseIgnored { .. } => Ok(()),
            Event::ReleaseRefused { holder, .. } => write!(f, " {}", holder),
        }
    }
}

#[derive(Default)]
struct Ledger {
    trace: Vec<TraceEntry>,
    tickets: HashMap<RequesterId, Ticket>,
}

type SharedLedger = Arc<Mutex<Ledger>>;

fn lock(ledger: &SharedLedger) -> MutexGuard<'_, Ledger> {
    ledger.lock().unwrap_or_else(|e| e.into_inner())
}

struct Train {
    id: RequesterId,
    ledger: SharedLedger,
}

impl Requester for Train {
    fn id(&self) -> RequesterId {
        self.id.clone()
    }

    fn on_admitted(&self, admission: &Admission) {
        let mut ledger = lock(&self.ledger);
        ledger.tickets.insert(self.id.clone(), admission.ticket);
        ledger.trace.push(TraceEntry::Arrived {
            train: self.id.clone(),
            ticket: admission.ticket,
        });
    }
}

/// A platform shared by trains
pub struct Station {
    coordinator: Arc<AdmissionCoordinator>,
    ledger: SharedLedger,
    events: Mutex<EventReceiver>,
}

impl Station {
    pub fn new(config: AdmissionConfig) -> Self {
        let bus = EventBus::new();
        let events = bus.subscribe(Subscription::to("station", "**"));
        Self {
            coordinator: Arc::new(AdmissionCoordinator::new(config).with_event_bus(bus)),
            ledger: SharedLedger::default(),
            events: Mutex::new(events),
        }
    }

    pub fn platform(&self) -> String {
        self.coordinator.resource()
    }

    /// A train asks to enter the platform
    pub fn arrive(&self, train: &str) -> GrantResult {
        let id = RequesterId::new(train);
        let known = self.coordinator.holder().as_ref() == Some(&id)
            || self.coordinator.waiting().contains(&id);

        let handle = Arc::new(Train {
            id: id.clone(),
            ledger: self.ledger.clone(),
        });
        let result = self.coordinator.request_arrival(handle);

        let mut ledger = lock(&self.ledger);
        if known {
            ledger.trace.push(TraceEntry::AlreadyHere { train: id });
            return result;
        }
        match result {
            GrantResult::Granted(ticket) => {
                ledger.tickets.insert(id.clone(), ticket);
                ledger.trace.push(TraceEntry::Arrived { train: id, ticket });
            }
            GrantResult::Queued { position } => {
                ledger.trace.push(TraceEntry::Waiting { train: id, position });
            }
        }
        result
    }

    /// The train on the platform leaves, presenting its ticket
    pub fn depart(&self, train: &str) -> Result<ReleaseOutcome, ScenarioError> {
        let id = RequesterId::new(train);
        let ticket = lock(&self.ledger).tickets.get(&id).copied();
        let Some(ticket) = ticket else {
            return Err(ScenarioError::NotAdmitted {
                train: train.to_string(),
            });
        };

        self.record(TraceEntry::Leaving { train: id.clone() });
        let outcome = self.coordinator.release(ticket)?;
        lock(&self.ledger).tickets.remove(&id);
        if outcome == ReleaseOutcome::Freed {
            self.record(TraceEntry::PlatformFree {
                platform: self.platform(),
            });
        }
        Ok(outcome)
    }

    /// Anyone frees the platform without a ticket
    pub fn release(&self) -> ReleaseOutcome {
        let platform = self.platform();
        self.record(TraceEntry::ReleaseRequested {
            platform: platform.clone(),
        });

        let outcome = self.coordinator.notify_release();
        let holder = self.coordinator.holder();
        let mut ledger = lock(&self.ledger);
        ledger.tickets.retain(|id, _| Some(id) == holder.as_ref());
        match (&outcome, holder) {
            (ReleaseOutcome::Freed, _) => ledger.trace.push(TraceEntry::PlatformFree { platform }),
            (ReleaseOutcome::AlreadyFree, _) => {
                ledger.trace.push(TraceEntry::ReleaseIgnored { platform })
            }
            (ReleaseOutcome::Refused, Some(holder)) => ledger
                .trace
                .push(TraceEntry::ReleaseRefused { platform, holder }),
            _ => {}
        }
        outcome
    }

    pub fn trace(&self) -> Vec<TraceEntry> {
        lock(&self.ledger).trace.clone()
    }

    /// Events published since the last call
    pub fn drain_events(&self) -> Vec<EventLine> {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        let mut lines = Vec::new();
        while let Ok(event) = events.try_recv() {
            lines.push(EventLine(event));
        }
        lines
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        self.coordinator.snapshot()
    }

    fn record(&self, entry: TraceEntry) {
        lock(&self.ledger).trace.push(entry);
    }
}

#[cfg(test)]
#[path = "railway_tests.rs"]
mod tests;
