// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thread-safe owner of an admission slot
//!
//! The coordinator serializes every decision through one mutex and turns
//! the slot's effects into actions. Actions run only after the mutex is
//! released: a requester notified of its admission may call straight back
//! into the coordinator.

use super::requester::{Admission, Requester};
use super::slot::{AdmissionSlot, GrantResult, ReleaseOutcome, SlotPhase, SlotSnapshot, Ticket};
use crate::clock::{Clock, SystemClock};
use crate::config::AdmissionConfig;
use crate::effect::{Effect, Event};
use crate::error::AdmissionError;
use crate::events::EventBus;
use crate::id::RequesterId;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Result of an arrival, including whether the requester was already known
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Arrival {
    pub result: GrantResult,
    pub duplicate: bool,
}

struct Inner {
    slot: AdmissionSlot,
    /// Handles of waiting requesters, dropped once they are admitted
    handles: HashMap<RequesterId, Arc<dyn Requester>>,
}

impl Inner {
    fn plan(&mut self, effects: Vec<Effect>) -> Vec<Action> {
        let resource = self.slot.resource().to_string();
        let mut actions = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::Emit(event) => actions.push(Action::Publish(event)),
                Effect::Admit { requester, ticket } => match self.handles.remove(&requester) {
                    Some(handle) => actions.push(Action::Admit(
                        handle,
                        Admission {
                            resource: resource.clone(),
                            ticket,
                        },
                    )),
                    None => {
                        tracing::warn!(%resource, %requester, "admitted requester has no handle");
                    }
                },
            }
        }
        actions
    }
}

enum Action {
    Publish(Event),
    Admit(Arc<dyn Requester>, Admission),
}

/// Coordinates admission of requesters to one shared slot.
///
/// Safe to share between threads (`Arc<AdmissionCoordinator>`). Construct
/// one per resource; there is no global instance.
pub struct AdmissionCoordinator<C: Clock = SystemClock> {
    inner: Mutex<Inner>,
    clock: C,
    bus: Option<EventBus>,
}

impl AdmissionCoordinator<SystemClock> {
    pub fn new(config: AdmissionConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> AdmissionCoordinator<C> {
    pub fn with_clock(config: AdmissionConfig, clock: C) -> Self {
        Self {
            inner: Mutex::new(Inner {
                slot: AdmissionSlot::new(config),
                handles: HashMap::new(),
            }),
            clock,
            bus: None,
        }
    }

    /// Publish every event this coordinator emits on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.bus.as_ref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn resource(&self) -> String {
        self.lock().slot.resource().to_string()
    }

    /// A requester asks for the slot.
    ///
    /// Returns `Granted` when the slot was free. Otherwise the requester is
    /// queued and its `on_admitted` is called when the slot reaches it.
    pub fn request_arrival(&self, requester: Arc<dyn Requester>) -> GrantResult {
        self.arrive(requester).result
    }

    pub(crate) fn arrive(&self, requester: Arc<dyn Requester>) -> Arrival {
        let id = requester.id();
        let (arrival, actions) = {
            let mut inner = self.lock();
            let duplicate =
                inner.slot.holder() == Some(&id) || inner.slot.position_of(&id).is_some();
            let (result, effects) = inner.slot.request(id.clone(), &self.clock);
            if !result.is_granted() {
                inner.handles.entry(id).or_insert(requester);
            }
            (Arrival { result, duplicate }, inner.plan(effects))
        };
        self.run(actions);
        arrival
    }

    /// The current holder is done with the slot.
    ///
    /// Frees the slot or hands it to the head of the queue. Releasing a free
    /// slot is a no-op reported as `AlreadyFree`.
    pub fn notify_release(&self) -> ReleaseOutcome {
        match self.release_with(None) {
            Ok(outcome) => outcome,
            Err(e) => {
                // Only a presented ticket can be rejected
                tracing::error!(error = %e, "anonymous release rejected");
                ReleaseOutcome::Refused
            }
        }
    }

    /// Release the grant identified by `ticket`.
    ///
    /// Fails with `StaleTicket` when the ticket does not match the current
    /// grant; the slot is left untouched.
    pub fn release(&self, ticket: Ticket) -> Result<ReleaseOutcome, AdmissionError> {
        self.release_with(Some(ticket))
    }

    fn release_with(&self, ticket: Option<Ticket>) -> Result<ReleaseOutcome, AdmissionError> {
        let (outcome, actions) = self.plan_release(ticket)?;
        self.run(actions);
        Ok(outcome)
    }

    fn plan_release(
        &self,
        ticket: Option<Ticket>,
    ) -> Result<(ReleaseOutcome, Vec<Action>), AdmissionError> {
        let mut inner = self.lock();
        let (outcome, effects) = inner.slot.release(ticket, &self.clock)?;
        Ok((outcome, inner.plan(effects)))
    }

    pub fn phase(&self) -> SlotPhase {
        self.lock().slot.phase()
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == SlotPhase::Idle
    }

    pub fn holder(&self) -> Option<RequesterId> {
        self.lock().slot.holder().cloned()
    }

    pub fn current_ticket(&self) -> Option<Ticket> {
        self.lock().slot.current_ticket()
    }

    /// Waiting requesters, head first
    pub fn waiting(&self) -> Vec<RequesterId> {
        self.lock().slot.waiting().cloned().collect()
    }

    pub fn held_for(&self) -> Option<Duration> {
        self.lock().slot.held_for(&self.clock)
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        self.lock().slot.snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Execute actions in order. Declined admissions are released here and
    /// their follow-up actions queued, so a run of declining requesters
    /// never deepens the call stack.
    fn run(&self, actions: Vec<Action>) {
        let mut pending = VecDeque::from(actions);
        while let Some(action) = pending.pop_front() {
            match action {
                Action::Publish(event) => {
                    tracing::info!(event = event.name(), resource = event.resource(), "event emitted");
                    if let Some(bus) = &self.bus {
                        bus.publish(&event);
                    }
                }
                Action::Admit(requester, admission) => {
                    tracing::debug!(
                        resource = %admission.resource,
                        requester = %requester.id(),
                        ticket = %admission.ticket,
                        "notifying admitted requester"
                    );
                    if requester.accept(&admission) {
                        continue;
                    }
                    tracing::debug!(
                        resource = %admission.resource,
                        requester = %requester.id(),
                        ticket = %admission.ticket,
                        "admission declined, passing slot on"
                    );
                    match self.plan_release(Some(admission.ticket)) {
                        Ok((_, next)) => pending.extend(next),
                        Err(e) => tracing::warn!(error = %e, "failed to release declined admission"),
                    }
                }
            }
        }
    }
}

impl<C: Clock> std::fmt::Debug for AdmissionCoordinator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionCoordinator")
            .field("slot", &self.snapshot())
            .field("bus", &self.bus)
            .finish()
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
