// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission coordination for a single shared slot
//!
//! This module provides:
//! - **AdmissionSlot** - Pure grant/queue/hand-off state machine
//! - **AdmissionCoordinator** - Thread-safe owner that executes slot effects
//! - **AdmissionGate** - Async entry point handing out RAII permits
//! - **Requester** - Callback contract for participants admitted from the queue

pub mod coordinator;
pub mod gate;
pub mod requester;
pub mod slot;

pub use coordinator::AdmissionCoordinator;
pub use gate::{AdmissionGate, Permit};
pub use requester::{Admission, Requester};
pub use slot::{
    AdmissionSlot, GrantResult, ReleaseOutcome, SlotPhase, SlotSnapshot, SlotState, Ticket,
};
