// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event dispatch for admission observers
//!
//! - `EventBus` - routes events to matching subscribers
//! - `EventPattern` - `category:action` matching with `*` and `**`

mod bus;
mod subscription;

pub use bus::{EventBus, EventReceiver, EventSender};
pub use subscription::{EventPattern, SubscriberId, Subscription};
