//! station-core: FIFO admission coordination for a single shared slot
//!
//! This crate provides:
//! - A pure slot state machine (grant, queue, hand-off) returning effects
//! - A thread-safe coordinator that executes those effects
//! - An async gate handing out RAII permits
//! - An explicitly constructed event bus for observers

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod config;
pub mod coordination;
pub mod effect;
pub mod error;
pub mod events;
pub mod id;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{AdmissionConfig, ConfigError, ReleasePolicy};
pub use coordination::{
    Admission, AdmissionCoordinator, AdmissionGate, AdmissionSlot, GrantResult, Permit,
    ReleaseOutcome, Requester, SlotPhase, SlotSnapshot, SlotState, Ticket,
};
pub use effect::{Effect, Event};
pub use error::AdmissionError;
pub use events::{EventBus, EventPattern, EventReceiver, SubscriberId, Subscription};
pub use id::{RequesterId, SequentialIdGen};
