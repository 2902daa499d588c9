// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::coordination::Ticket;
use crate::id::RequesterId;

fn released() -> Event {
    Event::SlotReleased {
        resource: "platform".to_string(),
        holder: RequesterId::new("passenger"),
        ticket: Ticket(1),
    }
}

fn queued() -> Event {
    Event::AdmissionQueued {
        resource: "platform".to_string(),
        requester: RequesterId::new("freight"),
        position: 1,
    }
}

#[tokio::test]
async fn matching_subscribers_receive_events() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(Subscription::to("slots", "slot:*"));

    assert_eq!(bus.publish(&released()), 1);

    let event = rx.recv().await.unwrap();
    assert_eq!(event, released());
}

#[test]
fn non_matching_events_are_not_delivered() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(Subscription::to("slots", "slot:*"));

    assert_eq!(bus.publish(&queued()), 0);
    assert!(rx.try_recv().is_err());
}

#[test]
fn every_matching_subscriber_gets_a_copy() {
    let bus = EventBus::new();
    let mut all = bus.subscribe(Subscription::to("all", "**"));
    let mut admissions = bus.subscribe(Subscription::to("admissions", "admission:*"));

    bus.publish(&queued());
    bus.publish(&released());

    assert_eq!(all.try_recv().unwrap(), queued());
    assert_eq!(all.try_recv().unwrap(), released());
    assert_eq!(admissions.try_recv().unwrap(), queued());
    assert!(admissions.try_recv().is_err());
}

#[test]
fn unsubscribe_removes_subscriber() {
    let bus = EventBus::new();
    let _rx = bus.subscribe(Subscription::to("watch", "*"));
    assert_eq!(bus.subscriber_count(), 1);

    assert!(bus.unsubscribe(&SubscriberId::new("watch")));
    assert!(!bus.unsubscribe(&SubscriberId::new("watch")));
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn dropped_receivers_are_pruned_on_publish() {
    let bus = EventBus::new();
    let rx = bus.subscribe(Subscription::to("gone", "**"));
    drop(rx);

    assert_eq!(bus.publish(&released()), 0);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn clones_share_subscribers() {
    let bus = EventBus::new();
    let publisher = bus.clone();
    let mut rx = bus.subscribe(Subscription::to("watch", "slot:released"));

    publisher.publish(&released());

    assert_eq!(rx.try_recv().unwrap(), released());
}
