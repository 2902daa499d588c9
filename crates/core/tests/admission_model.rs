// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Model-based tests for the admission coordinator
//!
//! Random operation sequences run against both the coordinator and a
//! minimal reference model; every answer and every admission notice must
//! agree.

use proptest::prelude::*;
use station_core::{
    Admission, AdmissionConfig, AdmissionCoordinator, FakeClock, GrantResult, ReleaseOutcome,
    Requester, RequesterId, Ticket,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<(RequesterId, Ticket)>>>;

struct Recorder {
    id: RequesterId,
    log: Log,
}

impl Requester for Recorder {
    fn id(&self) -> RequesterId {
        self.id.clone()
    }

    fn on_admitted(&self, admission: &Admission) {
        self.log
            .lock()
            .unwrap()
            .push((self.id.clone(), admission.ticket));
    }
}

/// Reference behaviour: one holder, a FIFO queue, a ticket counter
#[derive(Default)]
struct Model {
    holder: Option<(RequesterId, Ticket)>,
    queue: VecDeque<RequesterId>,
    last: u64,
}

impl Model {
    fn request(&mut self, id: RequesterId) -> GrantResult {
        match &self.holder {
            None => {
                self.last += 1;
                self.holder = Some((id, Ticket(self.last)));
                GrantResult::Granted(Ticket(self.last))
            }
            Some((holder, ticket)) if *holder == id => GrantResult::Granted(*ticket),
            Some(_) => {
                if let Some(i) = self.queue.iter().position(|w| *w == id) {
                    return GrantResult::Queued { position: i + 1 };
                }
                self.queue.push_back(id);
                GrantResult::Queued {
                    position: self.queue.len(),
                }
            }
        }
    }

    fn release(&mut self) -> (ReleaseOutcome, Option<(RequesterId, Ticket)>) {
        if self.holder.is_none() {
            return (ReleaseOutcome::AlreadyFree, None);
        }
        match self.queue.pop_front() {
            None => {
                self.holder = None;
                (ReleaseOutcome::Freed, None)
            }
            Some(next) => {
                self.last += 1;
                let ticket = Ticket(self.last);
                self.holder = Some((next.clone(), ticket));
                (
                    ReleaseOutcome::HandedOff {
                        to: next.clone(),
                        ticket,
                    },
                    Some((next, ticket)),
                )
            }
        }
    }
}

#[derive(Clone, Debug)]
enum Op {
    Arrive(u8),
    Depart,
    DepartWithStaleTicket,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..8u8).prop_map(Op::Arrive),
        3 => Just(Op::Depart),
        1 => Just(Op::DepartWithStaleTicket),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn coordinator_matches_model(ops in proptest::collection::vec(arb_op(), 1..80)) {
        let coordinator =
            AdmissionCoordinator::with_clock(AdmissionConfig::new("platform"), FakeClock::new());
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Arrive(n) => {
                    let id = RequesterId::new(format!("train-{}", n));
                    let requester = Arc::new(Recorder { id: id.clone(), log: log.clone() });
                    let actual = coordinator.request_arrival(requester);
                    prop_assert_eq!(actual, model.request(id));
                }
                Op::Depart => {
                    let before = log.lock().unwrap().len();
                    let actual = coordinator.notify_release();
                    let (expected, admitted) = model.release();
                    prop_assert_eq!(actual, expected);

                    // Exactly the head of the queue was notified, once
                    let log = log.lock().unwrap();
                    prop_assert_eq!(log.len(), before + usize::from(admitted.is_some()));
                    if let Some(admitted) = admitted {
                        prop_assert_eq!(log.last(), Some(&admitted));
                    }
                }
                Op::DepartWithStaleTicket => {
                    let stale = Ticket(model.last + 1);
                    prop_assert!(coordinator.release(stale).is_err());
                }
            }

            prop_assert_eq!(
                coordinator.holder(),
                model.holder.as_ref().map(|(id, _)| id.clone())
            );
            prop_assert_eq!(coordinator.waiting(), model.queue.iter().cloned().collect::<Vec<_>>());
        }
    }
}
