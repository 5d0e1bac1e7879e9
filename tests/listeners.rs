//! Listener Notification Integration Tests
//!
//! Tests for update delivery through the tracker: one notification per
//! mutation, full snapshots, and unsubscription.

use std::cell::RefCell;
use std::rc::Rc;

use pipeviz::core::EventTracker;
use pipeviz::domain::{EventConfig, EventRecord};

/// Records every snapshot a listener receives
fn recorder(tracker: &EventTracker) -> (Rc<RefCell<Vec<Vec<EventRecord>>>>, pipeviz::Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = tracker.on_update(move |events| sink.borrow_mut().push(events.to_vec()));
    (seen, subscription)
}

#[test]
fn test_one_notification_per_mutation() {
    let mut tracker = EventTracker::default();
    let (seen, _subscription) = recorder(&tracker);

    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();
    tracker
        .start_event("b", EventConfig::new("B", "x").with_parent("a"))
        .unwrap();
    tracker.update_progress("b", 10, None).unwrap();
    tracker.update_progress("b", 20, None).unwrap();
    tracker.complete_event("b", true, None).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 5);

    // Each notification carries the full snapshot at that moment
    assert_eq!(seen[0].len(), 1);
    assert_eq!(seen[1].len(), 2);
    assert_eq!(seen[1][0].children, vec!["b"]);
    assert_eq!(seen[2][1].progress, 10);
    assert_eq!(seen[3][1].progress, 20);
    assert_eq!(seen[4], tracker.all_events());
}

#[test]
fn test_rejected_calls_do_not_notify() {
    let mut tracker = EventTracker::default();
    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();
    tracker.complete_event("a", true, None).unwrap();

    let (seen, _subscription) = recorder(&tracker);

    let _ = tracker.start_event("a", EventConfig::new("A", "x"));
    let _ = tracker.update_progress("ghost", 50, None);
    let _ = tracker.complete_event("ghost", true, None);
    let _ = tracker.complete_event("a", false, Some("late"));

    assert!(seen.borrow().is_empty());
}

#[test]
fn test_clear_notifies_exactly_once() {
    let mut tracker = EventTracker::default();
    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();
    let (seen, _subscription) = recorder(&tracker);

    tracker.clear();
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].is_empty());

    // Clearing an empty tracker still notifies
    tracker.clear();
    assert_eq!(seen.borrow().len(), 2);
    assert!(tracker.all_events().is_empty());
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let mut tracker = EventTracker::default();
    let (first, first_sub) = recorder(&tracker);
    let (second, _second_sub) = recorder(&tracker);
    assert_eq!(tracker.listener_count(), 2);

    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();
    assert!(first_sub.unsubscribe());
    assert_eq!(tracker.listener_count(), 1);

    tracker.update_progress("a", 80, None).unwrap();
    tracker.clear();

    assert_eq!(first.borrow().len(), 1);
    assert_eq!(second.borrow().len(), 3);
}

#[test]
fn test_listeners_run_in_registration_order() {
    let mut tracker = EventTracker::default();
    let order = Rc::new(RefCell::new(Vec::new()));

    let subscriptions: Vec<_> = (0..3)
        .map(|i| {
            let order = Rc::clone(&order);
            tracker.on_update(move |_| order.borrow_mut().push(i))
        })
        .collect();

    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();
    assert_eq!(*order.borrow(), vec![0, 1, 2]);
    assert_eq!(subscriptions.len(), 3);
}

#[test]
fn test_panicking_listener_does_not_block_others() {
    let mut tracker = EventTracker::default();
    let _bad = tracker.on_update(|_| panic!("listener failure"));
    let (seen, _subscription) = recorder(&tracker);

    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();
    tracker.update_progress("a", 50, None).unwrap();

    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(tracker.get("a").unwrap().progress, 50);
}
