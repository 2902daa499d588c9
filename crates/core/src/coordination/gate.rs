// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Async entry to an admission coordinator
//!
//! `AdmissionGate::enter` resolves once the caller holds the slot and
//! returns a `Permit`. Dropping the permit releases the slot with the
//! permit's ticket, handing it to the next waiter.

use super::coordinator::AdmissionCoordinator;
use super::requester::{Admission, Requester};
use super::slot::{GrantResult, ReleaseOutcome, Ticket};
use crate::clock::{Clock, SystemClock};
use crate::error::AdmissionError;
use crate::id::RequesterId;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::oneshot;

/// Queued gate entrant, resolved through a oneshot channel
struct Waiter<C: Clock> {
    id: RequesterId,
    tx: Mutex<Option<oneshot::Sender<Permit<C>>>>,
    coordinator: Weak<AdmissionCoordinator<C>>,
}

impl<C: Clock> Requester for Waiter<C> {
    fn id(&self) -> RequesterId {
        self.id.clone()
    }

    fn on_admitted(&self, admission: &Admission) {
        if self.accept(admission) {
            return;
        }
        if let Some(coordinator) = self.coordinator.upgrade() {
            if let Err(e) = coordinator.release(admission.ticket) {
                tracing::warn!(requester = %self.id, error = %e, "failed to release admission");
            }
        }
    }

    /// Hand a permit to the waiting future. Declines when the future is gone.
    fn accept(&self, admission: &Admission) -> bool {
        let tx = self.tx.lock().unwrap_or_else(|e| e.into_inner()).take();
        let (Some(tx), Some(coordinator)) = (tx, self.coordinator.upgrade()) else {
            return false;
        };
        let permit = Permit {
            coordinator,
            holder: self.id.clone(),
            ticket: admission.ticket,
            released: false,
        };

        match tx.send(permit) {
            Ok(()) => true,
            Err(mut permit) => {
                // The coordinator releases declined admissions itself
                permit.released = true;
                tracing::debug!(
                    resource = %admission.resource,
                    requester = %self.id,
                    ticket = %admission.ticket,
                    "waiter gone, declining admission"
                );
                false
            }
        }
    }
}

/// Async front door to a shared coordinator
pub struct AdmissionGate<C: Clock = SystemClock> {
    coordinator: Arc<AdmissionCoordinator<C>>,
}

impl<C: Clock> Clone for AdmissionGate<C> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
        }
    }
}

impl<C: Clock> AdmissionGate<C> {
    pub fn new(coordinator: Arc<AdmissionCoordinator<C>>) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &Arc<AdmissionCoordinator<C>> {
        &self.coordinator
    }

    /// Wait until `id` holds the slot.
    ///
    /// Fails with `GateClosed` if `id` already holds or waits for the slot.
    /// The gate keeps the coordinator alive for the whole wait, so a queued
    /// entrant is always admitted eventually. Dropping the returned future
    /// while queued does not remove the entry; the admission is declined
    /// and passed on as soon as it arrives.
    pub async fn enter(&self, id: RequesterId) -> Result<Permit<C>, AdmissionError> {
        let (tx, rx) = oneshot::channel();
        let waiter = Arc::new(Waiter {
            id: id.clone(),
            tx: Mutex::new(Some(tx)),
            coordinator: Arc::downgrade(&self.coordinator),
        });

        let arrival = self.coordinator.arrive(waiter);
        if arrival.duplicate {
            tracing::warn!(requester = %id, "already holding or waiting at the gate");
            return Err(self.closed(id));
        }

        match arrival.result {
            GrantResult::Granted(ticket) => Ok(Permit {
                coordinator: self.coordinator.clone(),
                holder: id,
                ticket,
                released: false,
            }),
            GrantResult::Queued { position } => {
                tracing::debug!(requester = %id, position, "waiting at the gate");
                // The sender only disappears unsent if the coordinator does
                rx.await.map_err(|_| self.closed(id))
            }
        }
    }

    fn closed(&self, requester: RequesterId) -> AdmissionError {
        AdmissionError::GateClosed {
            resource: self.coordinator.resource(),
            requester,
        }
    }
}

impl<C: Clock> std::fmt::Debug for AdmissionGate<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionGate")
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

/// Proof of holding the slot. Releases on drop.
#[must_use = "dropping a permit releases the slot immediately"]
pub struct Permit<C: Clock = SystemClock> {
    coordinator: Arc<AdmissionCoordinator<C>>,
    holder: RequesterId,
    ticket: Ticket,
    released: bool,
}

impl<C: Clock> Permit<C> {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn holder(&self) -> &RequesterId {
        &self.holder
    }

    /// Release now and report what happened
    pub fn release(mut self) -> Result<ReleaseOutcome, AdmissionError> {
        self.released = true;
        self.coordinator.release(self.ticket)
    }
}

impl<C: Clock> Drop for Permit<C> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.coordinator.release(self.ticket) {
            tracing::warn!(holder = %self.holder, error = %e, "permit release failed");
        }
    }
}

impl<C: Clock> std::fmt::Debug for Permit<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Permit")
            .field("holder", &self.holder)
            .field("ticket", &self.ticket)
            .finish()
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
