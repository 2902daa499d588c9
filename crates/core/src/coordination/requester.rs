// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Participant side of admission

use super::slot::Ticket;
use crate::id::RequesterId;
use serde::{Deserialize, Serialize};

/// Notice delivered to a requester admitted from the wait queue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub resource: String,
    pub ticket: Ticket,
}

/// A participant that can wait for the slot.
///
/// `on_admitted` runs after the coordinator has released its internal lock,
/// so implementations may call back into the coordinator (for example to
/// depart immediately).
pub trait Requester: Send + Sync {
    fn id(&self) -> RequesterId;

    fn on_admitted(&self, admission: &Admission);

    /// Deliver an admission.
    ///
    /// Returning `false` declines it: the coordinator releases the ticket
    /// itself and moves on to the next waiter without nesting calls.
    fn accept(&self, admission: &Admission) -> bool {
        self.on_admitted(admission);
        true
    }
}
