// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission errors

use crate::coordination::Ticket;
use crate::id::RequesterId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// The presented ticket is not the current grant
    #[error("stale ticket {presented} for {resource}: {}", describe_current(.current))]
    StaleTicket {
        resource: String,
        presented: Ticket,
        current: Option<Ticket>,
    },
    /// The gate refused the requester, which already holds or waits for the slot
    #[error("admission to {resource} closed before {requester} was admitted")]
    GateClosed {
        resource: String,
        requester: RequesterId,
    },
}

fn describe_current(current: &Option<Ticket>) -> String {
    match current {
        Some(ticket) => format!("slot is held under {}", ticket),
        None => "slot is free".to_string(),
    }
}
