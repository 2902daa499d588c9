// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event name patterns and subscriptions

/// Pattern over `:`-separated event names
///
/// - `slot:handoff` matches exactly that name
/// - `slot:*` matches one segment in that position (`slot:released`, not `slot:release:ignored`)
/// - `slot:**` matches every remaining segment
/// - a bare `*` or `**` matches every event; an empty pattern matches none
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn matches(&self, event_name: &str) -> bool {
        match self.0.as_str() {
            "" => return false,
            "*" | "**" => return true,
            _ => {}
        }

        let mut pattern = self.0.split(':');
        let mut name = event_name.split(':');
        loop {
            match (pattern.next(), name.next()) {
                (None, None) => return true,
                (Some("**"), _) => return true,
                (Some("*"), Some(_)) => continue,
                (Some(p), Some(n)) if p == n => continue,
                _ => return false,
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Handle used to unsubscribe
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

impl SubscriberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// A named set of patterns; an event is delivered when any pattern matches
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub patterns: Vec<EventPattern>,
}

impl Subscription {
    pub fn new(id: impl Into<String>, patterns: Vec<EventPattern>) -> Self {
        Self {
            id: SubscriberId::new(id),
            patterns,
        }
    }

    /// Subscription with a single pattern
    pub fn to(id: impl Into<String>, pattern: &str) -> Self {
        Self::new(id, vec![EventPattern::new(pattern)])
    }

    pub fn matches(&self, event_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(event_name))
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
