// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slot state machine for single-holder admission with a FIFO wait queue
//!
//! The slot never performs side effects itself. Every operation returns a
//! typed outcome plus the effects its owner must carry out (publish events,
//! notify the requester admitted from the queue).

use crate::clock::Clock;
use crate::config::{AdmissionConfig, ReleasePolicy};
use crate::effect::{Effect, Event};
use crate::error::AdmissionError;
use crate::id::RequesterId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Grant number. Every grant, immediate or from the queue, gets a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(pub u64);

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Slot state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Nobody holds the slot (the wait queue is then always empty)
    Free,
    /// Exactly one requester holds the slot
    Held {
        holder: RequesterId,
        ticket: Ticket,
        since: Instant,
    },
}

/// Coarse phase of the slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPhase {
    Idle,
    Occupied,
}

/// Answer to an arrival request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantResult {
    /// The requester holds the slot under this ticket
    Granted(Ticket),
    /// The requester waits; `position` is 1 for the head of the queue
    Queued { position: usize },
}

impl GrantResult {
    pub fn is_granted(&self) -> bool {
        matches!(self, GrantResult::Granted(_))
    }
}

/// What a release did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Slot is free and nobody was waiting
    Freed,
    /// Head of the queue now holds the slot
    HandedOff { to: RequesterId, ticket: Ticket },
    /// Slot was already free; nothing changed
    AlreadyFree,
    /// Anonymous release refused under `ReleasePolicy::Holder`; nothing changed
    Refused,
}

/// Serializable view of a slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub resource: String,
    pub phase: SlotPhase,
    pub holder: Option<RequesterId>,
    pub ticket: Option<Ticket>,
    pub waiting: Vec<RequesterId>,
}

/// Single slot with a FIFO queue of waiting requesters
#[derive(Clone, Debug)]
pub struct AdmissionSlot {
    config: AdmissionConfig,
    state: SlotState,
    waiting: VecDeque<RequesterId>,
    last_ticket: u64,
}

impl AdmissionSlot {
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            config,
            state: SlotState::Free,
            waiting: VecDeque::new(),
            last_ticket: 0,
        }
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    pub fn resource(&self) -> &str {
        &self.config.name
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn phase(&self) -> SlotPhase {
        match self.state {
            SlotState::Free => SlotPhase::Idle,
            SlotState::Held { .. } => SlotPhase::Occupied,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self.state, SlotState::Free)
    }

    pub fn holder(&self) -> Option<&RequesterId> {
        match &self.state {
            SlotState::Free => None,
            SlotState::Held { holder, .. } => Some(holder),
        }
    }

    pub fn current_ticket(&self) -> Option<Ticket> {
        match &self.state {
            SlotState::Free => None,
            SlotState::Held { ticket, .. } => Some(*ticket),
        }
    }

    /// How long the current holder has held the slot
    pub fn held_for(&self, clock: &impl Clock) -> Option<Duration> {
        match &self.state {
            SlotState::Free => None,
            SlotState::Held { since, .. } => Some(clock.since(*since)),
        }
    }

    /// Waiting requesters, head first
    pub fn waiting(&self) -> impl Iterator<Item = &RequesterId> {
        self.waiting.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// 1-based queue position of a waiting requester
    pub fn position_of(&self, requester: &RequesterId) -> Option<usize> {
        self.waiting
            .iter()
            .position(|w| w == requester)
            .map(|i| i + 1)
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        SlotSnapshot {
            resource: self.resource().to_string(),
            phase: self.phase(),
            holder: self.holder().cloned(),
            ticket: self.current_ticket(),
            waiting: self.waiting.iter().cloned().collect(),
        }
    }

    /// Ask for the slot.
    ///
    /// Grants immediately when free, otherwise appends to the queue. A
    /// requester that already holds or waits for the slot keeps its grant or
    /// its place.
    pub fn request(
        &mut self,
        requester: RequesterId,
        clock: &impl Clock,
    ) -> (GrantResult, Vec<Effect>) {
        let resource = self.config.name.clone();

        let current = match &self.state {
            SlotState::Free => None,
            SlotState::Held { holder, ticket, .. } => Some((holder == &requester, *ticket)),
        };

        match current {
            None => {
                let ticket = self.grant(requester.clone(), clock);
                tracing::debug!(%resource, %requester, %ticket, "slot granted");
                let effects = vec![Effect::Emit(Event::AdmissionGranted {
                    resource,
                    requester,
                    ticket,
                })];
                (GrantResult::Granted(ticket), effects)
            }
            Some((true, ticket)) => {
                tracing::debug!(%resource, %requester, "holder asked again");
                let effects = vec![Effect::Emit(Event::AdmissionDuplicate {
                    resource,
                    requester,
                })];
                (GrantResult::Granted(ticket), effects)
            }
            Some((false, _)) => {
                if let Some(position) = self.position_of(&requester) {
                    tracing::debug!(%resource, %requester, position, "already waiting");
                    let effects = vec![Effect::Emit(Event::AdmissionDuplicate {
                        resource,
                        requester,
                    })];
                    return (GrantResult::Queued { position }, effects);
                }

                self.waiting.push_back(requester.clone());
                let position = self.waiting.len();
                tracing::debug!(%resource, %requester, position, "queued");
                let effects = vec![Effect::Emit(Event::AdmissionQueued {
                    resource,
                    requester,
                    position,
                })];
                (GrantResult::Queued { position }, effects)
            }
        }
    }

    /// Give the slot back.
    ///
    /// `ticket` of `None` is an anonymous release: it frees whoever holds the
    /// slot unless the policy is `ReleasePolicy::Holder`. A presented ticket
    /// must match the current grant.
    pub fn release(
        &mut self,
        ticket: Option<Ticket>,
        clock: &impl Clock,
    ) -> Result<(ReleaseOutcome, Vec<Effect>), AdmissionError> {
        let resource = self.config.name.clone();

        let (holder, current) = match &self.state {
            SlotState::Free => {
                if let Some(presented) = ticket {
                    return Err(AdmissionError::StaleTicket {
                        resource,
                        presented,
                        current: None,
                    });
                }
                tracing::warn!(%resource, "release on a free slot ignored");
                let effects = vec![Effect::Emit(Event::ReleaseIgnored { resource })];
                return Ok((ReleaseOutcome::AlreadyFree, effects));
            }
            SlotState::Held { holder, ticket, .. } => (holder.clone(), *ticket),
        };

        match ticket {
            Some(presented) if presented != current => {
                return Err(AdmissionError::StaleTicket {
                    resource,
                    presented,
                    current: Some(current),
                });
            }
            None if self.config.release_policy == ReleasePolicy::Holder => {
                tracing::warn!(%resource, %holder, "anonymous release refused");
                let effects = vec![Effect::Emit(Event::ReleaseRefused { resource, holder })];
                return Ok((ReleaseOutcome::Refused, effects));
            }
            _ => {}
        }

        let Some(next) = self.waiting.pop_front() else {
            self.state = SlotState::Free;
            tracing::debug!(%resource, %holder, ticket = %current, "slot freed");
            let effects = vec![Effect::Emit(Event::SlotReleased {
                resource,
                holder,
                ticket: current,
            })];
            return Ok((ReleaseOutcome::Freed, effects));
        };

        let ticket = self.grant(next.clone(), clock);
        tracing::debug!(%resource, from = %holder, to = %next, %ticket, "slot handed off");
        let effects = vec![
            Effect::Emit(Event::SlotHandedOff {
                resource: resource.clone(),
                from: holder,
                to: next.clone(),
                ticket,
            }),
            Effect::Emit(Event::AdmissionGranted {
                resource,
                requester: next.clone(),
                ticket,
            }),
            Effect::Admit {
                requester: next.clone(),
                ticket,
            },
        ];
        Ok((ReleaseOutcome::HandedOff { to: next, ticket }, effects))
    }

    fn grant(&mut self, holder: RequesterId, clock: &impl Clock) -> Ticket {
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        self.state = SlotState::Held {
            holder,
            ticket,
            since: clock.now(),
        };
        ticket
    }
}

#[cfg(test)]
#[path = "slot_tests.rs"]
mod tests;
