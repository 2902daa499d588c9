// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two components that only talk through a mediator
//!
//! Components report the signal they just handled; the mediator decides
//! which follow-up operations run. Neither component knows the other.

use serde::Serialize;

/// Operations the components can perform
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Signal {
    A,
    B,
    C,
    D,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Signal::A => "A",
            Signal::B => "B",
            Signal::C => "C",
            Signal::D => "D",
        };
        f.write_str(name)
    }
}

/// Component that performs a signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    First,
    Second,
}

impl Component {
    fn number(self) -> u8 {
        match self {
            Component::First => 1,
            Component::Second => 2,
        }
    }
}

impl Signal {
    pub fn performer(self) -> Component {
        match self {
            Signal::A | Signal::B => Component::First,
            Signal::C | Signal::D => Component::Second,
        }
    }

    /// Follow-up operations the mediator triggers after this signal
    pub fn reactions(self) -> &'static [Signal] {
        match self {
            Signal::A => &[Signal::C],
            Signal::D => &[Signal::B, Signal::C],
            Signal::B | Signal::C => &[],
        }
    }
}

/// Mediator that records what every component does
#[derive(Debug, Default)]
pub struct Mediator {
    lines: Vec<String>,
}

impl Mediator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client asks for an operation
    pub fn trigger(&mut self, signal: Signal) {
        self.lines
            .push(format!("Client triggers operation {}.", signal));
        self.perform(signal);
    }

    fn perform(&mut self, signal: Signal) {
        self.lines.push(format!(
            "Component {} does {}.",
            signal.performer().number(),
            signal
        ));
        self.notify(signal);
    }

    fn notify(&mut self, signal: Signal) {
        let reactions = signal.reactions();
        if reactions.is_empty() {
            return;
        }
        self.lines.push(format!(
            "Mediator reacts on {} and triggers following operations:",
            signal
        ));
        for &next in reactions {
            self.perform(next);
        }
    }

    /// Separate client requests with a blank line
    pub fn pause(&mut self) {
        self.lines.push(String::new());
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Client triggers A, then D
pub fn client_trace() -> Vec<String> {
    let mut mediator = Mediator::new();
    mediator.trigger(Signal::A);
    mediator.pause();
    mediator.trigger(Signal::D);
    mediator.into_lines()
}
