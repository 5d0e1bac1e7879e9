//! Authoritative in-memory event collection.
//!
//! The tracker owns every [`EventRecord`], keyed by id in insertion order.
//! Each successful mutation notifies all listeners synchronously with the
//! full snapshot before returning. Rejected calls leave state untouched and
//! notify nobody.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::domain::{
    EventConfig, EventRecord, EventStatus, EventTypeConfig, EventTypeDefinition,
    NodeStyleDefinition, TypeRegistry,
};

use super::clock::{Clock, SystemClock};
use super::listeners::{ListenerRegistry, Subscription};

/// Why a tracker call was ignored.
///
/// These never indicate corrupted state; the call was simply a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("Event {0} already exists")]
    DuplicateId(String),

    #[error("Unknown event: {0}")]
    UnknownId(String),

    #[error("Event {0} already finished; use amend_completion to change it")]
    AlreadyCompleted(String),
}

/// Tracks event lifecycles and fans out updates
pub struct EventTracker {
    /// Records in insertion order
    events: Vec<EventRecord>,

    /// id -> position in `events`
    index: HashMap<String, usize>,

    types: TypeRegistry,
    listeners: ListenerRegistry,
    clock: Box<dyn Clock>,
}

impl Default for EventTracker {
    fn default() -> Self {
        Self::new(EventTypeConfig::default())
    }
}

impl std::fmt::Debug for EventTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTracker")
            .field("events", &self.events.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl EventTracker {
    /// Create a tracker stamped by the wall clock
    pub fn new(config: EventTypeConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create a tracker with a custom time source
    pub fn with_clock(config: EventTypeConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            events: Vec::new(),
            index: HashMap::new(),
            types: TypeRegistry::new(config),
            listeners: ListenerRegistry::new(),
            clock,
        }
    }

    /// Start a new running event.
    ///
    /// The parent link is only made when `parent_id` names an event that
    /// already exists; otherwise the event starts parent-less.
    #[instrument(skip(self, config), fields(event_type = %config.event_type))]
    pub fn start_event(&mut self, id: &str, config: EventConfig) -> Result<(), TrackerError> {
        if self.index.contains_key(id) {
            warn!("Event {} already exists", id);
            return Err(TrackerError::DuplicateId(id.to_string()));
        }

        let parent_id = config.parent_id.clone();
        let mut record = EventRecord::new(id, config, self.clock.now_ms());

        if let Some(parent_id) = parent_id {
            match self.index.get(&parent_id) {
                Some(&parent_pos) => {
                    self.events[parent_pos].children.push(id.to_string());
                    record.parent = Some(parent_id);
                }
                None => debug!(parent = %parent_id, "Parent not found, starting as root"),
            }
        }

        self.index.insert(id.to_string(), self.events.len());
        self.events.push(record);
        self.notify();
        Ok(())
    }

    /// Set progress (clamped to 100) and, if given and non-empty, the
    /// status message
    pub fn update_progress(
        &mut self,
        id: &str,
        progress: u8,
        message: Option<&str>,
    ) -> Result<(), TrackerError> {
        let record = self.record_mut(id)?;
        record.progress = progress.min(100);
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            record.message = Some(message.to_string());
        }

        self.notify();
        Ok(())
    }

    /// Finish a running event as completed or failed.
    ///
    /// An event that already finished is left alone; see
    /// [`amend_completion`](Self::amend_completion).
    pub fn complete_event(
        &mut self,
        id: &str,
        success: bool,
        error: Option<&str>,
    ) -> Result<(), TrackerError> {
        let now = self.clock.now_ms();
        let record = self.record_mut(id)?;
        if record.is_terminal() {
            warn!(event = id, status = %record.status, "Event already finished");
            return Err(TrackerError::AlreadyCompleted(id.to_string()));
        }

        record.status = finished_status(success);
        record.end_time = Some(now);
        if let Some(error) = error.filter(|e| !e.is_empty()) {
            record.error = Some(error.to_string());
        }

        self.notify();
        Ok(())
    }

    /// Overwrite the outcome of an event, finished or not.
    ///
    /// Restamps `end_time` and replaces the error (cleared when `error` is
    /// `None` or empty).
    pub fn amend_completion(
        &mut self,
        id: &str,
        success: bool,
        error: Option<&str>,
    ) -> Result<(), TrackerError> {
        let now = self.clock.now_ms();
        let record = self.record_mut(id)?;
        debug!(event = id, previous = %record.status, success, "Amending completion");

        record.status = finished_status(success);
        record.end_time = Some(now);
        record.error = error.filter(|e| !e.is_empty()).map(str::to_string);

        self.notify();
        Ok(())
    }

    /// Drop every event. Always notifies, even when already empty.
    pub fn clear(&mut self) {
        self.events.clear();
        self.index.clear();
        self.notify();
    }

    /// Register a listener for the full snapshot after each mutation
    pub fn on_update<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&[EventRecord]) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Owned snapshot of all events in insertion order
    pub fn all_events(&self) -> Vec<EventRecord> {
        self.events.clone()
    }

    /// Borrowed view of all events in insertion order
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&EventRecord> {
        self.index.get(id).map(|&pos| &self.events[pos])
    }

    /// Resolve an event's parent link
    pub fn parent_of(&self, id: &str) -> Option<&EventRecord> {
        self.get(id)?.parent.as_deref().and_then(|p| self.get(p))
    }

    /// Resolve an event's children, in creation order
    pub fn children_of(&self, id: &str) -> Vec<&EventRecord> {
        self.get(id)
            .map(|record| record.children.iter().filter_map(|c| self.get(c)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Type definition for a type key, or the default type's
    pub fn event_type_definition(&self, event_type: &str) -> &EventTypeDefinition {
        self.types.definition(event_type)
    }

    pub fn event_type_definitions(&self) -> &BTreeMap<String, EventTypeDefinition> {
        self.types.definitions()
    }

    pub fn node_style_definition(&self) -> Option<&NodeStyleDefinition> {
        self.types.node_styles()
    }

    /// The merged type registry, for layout projection
    pub fn type_registry(&self) -> &TypeRegistry {
        &self.types
    }

    fn record_mut(&mut self, id: &str) -> Result<&mut EventRecord, TrackerError> {
        match self.index.get(id) {
            Some(&pos) => Ok(&mut self.events[pos]),
            None => {
                debug!(event = id, "Ignoring update for unknown event");
                Err(TrackerError::UnknownId(id.to_string()))
            }
        }
    }

    fn notify(&self) {
        self.listeners.notify(&self.events);
    }
}

fn finished_status(success: bool) -> EventStatus {
    if success {
        EventStatus::Completed
    } else {
        EventStatus::Failed
    }
}
