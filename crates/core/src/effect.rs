// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events produced by the slot state machine

use crate::coordination::Ticket;
use crate::id::RequesterId;
use serde::{Deserialize, Serialize};

/// Side effects the slot asks its owner to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Publish an event to observers
    Emit(Event),
    /// Tell a queued requester it now holds the slot
    Admit {
        requester: RequesterId,
        ticket: Ticket,
    },
}

/// Observable admission events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    AdmissionGranted {
        resource: String,
        requester: RequesterId,
        ticket: Ticket,
    },
    AdmissionQueued {
        resource: String,
        requester: RequesterId,
        position: usize,
    },
    AdmissionDuplicate {
        resource: String,
        requester: RequesterId,
    },
    SlotReleased {
        resource: String,
        holder: RequesterId,
        ticket: Ticket,
    },
    SlotHandedOff {
        resource: String,
        from: RequesterId,
        to: RequesterId,
        ticket: Ticket,
    },
    ReleaseIgnored {
        resource: String,
    },
    ReleaseRefused {
        resource: String,
        holder: RequesterId,
    },
}

impl Event {
    /// Event name for pattern matching, formatted as `category:action`
    pub fn name(&self) -> &'static str {
        match self {
            Event::AdmissionGranted { .. } => "admission:granted",
            Event::AdmissionQueued { .. } => "admission:queued",
            Event::AdmissionDuplicate { .. } => "admission:duplicate",
            Event::SlotReleased { .. } => "slot:released",
            Event::SlotHandedOff { .. } => "slot:handoff",
            Event::ReleaseIgnored { .. } => "slot:release:ignored",
            Event::ReleaseRefused { .. } => "slot:release:refused",
        }
    }

    /// Resource the event belongs to
    pub fn resource(&self) -> &str {
        match self {
            Event::AdmissionGranted { resource, .. }
            | Event::AdmissionQueued { resource, .. }
            | Event::AdmissionDuplicate { resource, .. }
            | Event::SlotReleased { resource, .. }
            | Event::SlotHandedOff { resource, .. }
            | Event::ReleaseIgnored { resource }
            | Event::ReleaseRefused { resource, .. } => resource,
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
