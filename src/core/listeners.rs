//! Listener registry for tracker notifications.
//!
//! Listeners are kept in registration order and called synchronously on
//! the thread that mutated the tracker. A panicking listener is logged and
//! skipped; the others still run.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::error;

use crate::domain::EventRecord;

type Callback = Box<dyn FnMut(&[EventRecord])>;

/// Identifies one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    callback: Rc<RefCell<Callback>>,
}

#[derive(Default)]
struct RegistryState {
    entries: Vec<ListenerEntry>,
    next_id: u64,
}

impl RegistryState {
    fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }
}

/// Ordered list of update callbacks
#[derive(Default)]
pub struct ListenerRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback at the end of the list
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&[EventRecord]) + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.entries.push(ListenerEntry {
            id,
            callback: Rc::new(RefCell::new(Box::new(callback))),
        });

        Subscription {
            id,
            registry: Rc::downgrade(&self.state),
        }
    }

    /// Remove a listener by id; false if it was already gone
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.state.borrow_mut().remove(id)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every listener with the snapshot, in registration order.
    ///
    /// The list is copied before dispatch so listeners may subscribe or
    /// unsubscribe while it runs. A listener removed mid-dispatch is not
    /// called; one added mid-dispatch waits for the next notification.
    pub fn notify(&self, events: &[EventRecord]) {
        let round: Vec<(ListenerId, Rc<RefCell<Callback>>)> = self
            .state
            .borrow()
            .entries
            .iter()
            .map(|e| (e.id, Rc::clone(&e.callback)))
            .collect();

        for (id, callback) in round {
            if !self.state.borrow().contains(id) {
                continue;
            }

            let Ok(mut guard) = callback.try_borrow_mut() else {
                // Already running further up the stack
                continue;
            };

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (&mut **guard)(events)));
            if outcome.is_err() {
                error!(listener = id.0, "Update listener panicked");
            }
        }
    }
}

/// Handle returned by a subscription; removes exactly that listener.
///
/// Dropping the handle leaves the listener registered.
#[derive(Debug)]
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RefCell<RegistryState>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        let Some(state) = self.registry.upgrade() else {
            return false;
        };
        let active = state.borrow().contains(self.id);
        active
    }

    /// Remove the listener. Returns false if it was already removed or the
    /// tracker is gone.
    pub fn unsubscribe(self) -> bool {
        let Some(state) = self.registry.upgrade() else {
            return false;
        };
        let removed = state.borrow_mut().remove(self.id);
        removed
    }
}
