//! Event Tracker Integration Tests
//!
//! Tests for record lifecycle, parent/child linkage and type lookups.

use pipeviz::core::{EventTracker, ManualClock, TrackerError};
use pipeviz::domain::{EventConfig, EventStatus, EventTypeConfig, Icon};

fn tracker() -> EventTracker {
    EventTracker::new(EventTypeConfig::default())
}

#[test]
fn test_unique_ids_counted_once() {
    let mut tracker = tracker();

    for id in ["a", "b", "c", "b", "a"] {
        let _ = tracker.start_event(id, EventConfig::new(format!("Event {}", id), "x"));
    }

    assert_eq!(tracker.all_events().len(), 3);
}

#[test]
fn test_duplicate_leaves_first_record_untouched() {
    let mut tracker = tracker();
    tracker
        .start_event("a", EventConfig::new("Original", "api-call").in_pipeline("p1"))
        .unwrap();
    tracker.update_progress("a", 30, Some("working")).unwrap();
    let before = tracker.get("a").unwrap().clone();

    let result = tracker.start_event("a", EventConfig::new("Impostor", "database"));

    assert_eq!(result, Err(TrackerError::DuplicateId("a".to_string())));
    assert_eq!(tracker.get("a").unwrap(), &before);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_children_in_insertion_order() {
    let mut tracker = tracker();
    tracker.start_event("root", EventConfig::new("Root", "x")).unwrap();
    for id in ["c1", "c2", "c3"] {
        tracker
            .start_event(id, EventConfig::new(id, "x").with_parent("root"))
            .unwrap();
    }

    let root = tracker.get("root").unwrap();
    assert_eq!(root.children, vec!["c1", "c2", "c3"]);

    for id in ["c1", "c2", "c3"] {
        assert_eq!(root.children.iter().filter(|c| *c == id).count(), 1);
        assert_eq!(tracker.parent_of(id).map(|p| p.id.as_str()), Some("root"));
    }

    let children: Vec<&str> = tracker
        .children_of("root")
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(children, vec!["c1", "c2", "c3"]);
}

#[test]
fn test_missing_parent_starts_as_root() {
    let mut tracker = tracker();
    tracker
        .start_event("orphan", EventConfig::new("Orphan", "x").with_parent("ghost"))
        .unwrap();

    let orphan = tracker.get("orphan").unwrap();
    assert!(orphan.is_root());
    assert!(tracker.parent_of("orphan").is_none());
}

#[test]
fn test_unknown_id_changes_nothing() {
    let mut tracker = tracker();
    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();
    let before = tracker.all_events();

    assert_eq!(
        tracker.update_progress("ghost", 50, Some("hi")),
        Err(TrackerError::UnknownId("ghost".to_string()))
    );
    assert_eq!(
        tracker.complete_event("ghost", false, Some("boom")),
        Err(TrackerError::UnknownId("ghost".to_string()))
    );

    assert_eq!(tracker.all_events(), before);
    assert!(tracker.get("ghost").is_none());
}

#[test]
fn test_completion_outcomes() {
    let mut tracker = tracker();
    tracker.start_event("ok", EventConfig::new("Ok", "x")).unwrap();
    tracker.start_event("bad", EventConfig::new("Bad", "x")).unwrap();

    tracker.complete_event("ok", true, None).unwrap();
    tracker.complete_event("bad", false, Some("msg")).unwrap();

    let ok = tracker.get("ok").unwrap();
    assert_eq!(ok.status, EventStatus::Completed);
    assert!(ok.error.is_none());
    assert!(ok.end_time.is_some());

    let bad = tracker.get("bad").unwrap();
    assert_eq!(bad.status, EventStatus::Failed);
    assert_eq!(bad.error.as_deref(), Some("msg"));
}

#[test]
fn test_recompletion_is_ignored_until_amended() {
    let clock = ManualClock::new(0);
    let mut tracker = EventTracker::with_clock(EventTypeConfig::default(), Box::new(clock.clone()));
    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();

    clock.set(100);
    tracker.complete_event("a", false, Some("flaky")).unwrap();

    clock.set(200);
    assert_eq!(
        tracker.complete_event("a", true, None),
        Err(TrackerError::AlreadyCompleted("a".to_string()))
    );
    let a = tracker.get("a").unwrap();
    assert_eq!(a.status, EventStatus::Failed);
    assert_eq!(a.end_time, Some(100));

    tracker.amend_completion("a", true, None).unwrap();
    let a = tracker.get("a").unwrap();
    assert_eq!(a.status, EventStatus::Completed);
    assert!(a.error.is_none());
    assert_eq!(a.end_time, Some(200));
    assert_eq!(a.duration_ms(), Some(200));
}

#[test]
fn test_clear_empties_and_unlinks() {
    let mut tracker = tracker();
    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();
    tracker
        .start_event("b", EventConfig::new("B", "x").with_parent("a"))
        .unwrap();

    tracker.clear();
    assert!(tracker.all_events().is_empty());
    assert!(tracker.parent_of("b").is_none());

    // Reused ids start fresh, with no stale links
    tracker.start_event("b", EventConfig::new("B again", "x")).unwrap();
    assert!(tracker.get("b").unwrap().is_root());

    tracker.clear();
    tracker.clear();
    assert!(tracker.is_empty());
}

#[test]
fn test_concrete_scenario() {
    let mut tracker = tracker();

    tracker.start_event("a", EventConfig::new("A", "x")).unwrap();
    tracker
        .start_event("b", EventConfig::new("B", "x").with_parent("a"))
        .unwrap();
    tracker.complete_event("a", true, None).unwrap();
    tracker.update_progress("b", 50, None).unwrap();
    tracker.complete_event("b", false, Some("boom")).unwrap();

    let events = tracker.all_events();
    assert_eq!(events.len(), 2);

    let a = tracker.get("a").unwrap();
    assert_eq!(a.status, EventStatus::Completed);
    assert_eq!(a.children, vec!["b"]);

    let b = tracker.get("b").unwrap();
    assert_eq!(b.status, EventStatus::Failed);
    assert_eq!(b.error.as_deref(), Some("boom"));
    assert_eq!(b.progress, 50);
    assert_eq!(tracker.parent_of("b").map(|p| p.id.as_str()), Some("a"));
}

#[test]
fn test_snapshot_in_insertion_order() {
    let mut tracker = tracker();
    for id in ["z", "m", "a"] {
        tracker.start_event(id, EventConfig::new(id, "x")).unwrap();
    }

    let ids: Vec<String> = tracker.all_events().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["z", "m", "a"]);
}

#[test]
fn test_type_lookups() {
    let config = EventTypeConfig::from_yaml(
        r##"
default_event_type: api-call
event_types:
  api-call:
    name: Remote Call
    icon: Cloud
    color: { primary: "#000000", secondary: "#111111", background: "#222222" }
  mystery:
    name: Mystery
    icon: NoSuchIcon
    color: { primary: "#333333", secondary: "#444444", background: "#555555" }
node_styles:
  width: 280px
"##,
    )
    .unwrap();
    let tracker = EventTracker::new(config);

    // Caller entries win per key; built-ins remain for the rest
    assert_eq!(tracker.event_type_definition("api-call").name, "Remote Call");
    assert_eq!(tracker.event_type_definition("api-call").icon, Icon::Cloud);
    assert_eq!(tracker.event_type_definition("database").name, "Database");

    // Unknown icon names resolve to the fallback
    assert_eq!(tracker.event_type_definition("mystery").icon, Icon::FALLBACK);

    // Unknown types use the configured default
    assert_eq!(tracker.event_type_definition("???").name, "Remote Call");

    assert!(tracker.event_type_definitions().contains_key("file-operation"));
    assert_eq!(
        tracker.node_style_definition().and_then(|s| s.width.as_deref()),
        Some("280px")
    );
}
