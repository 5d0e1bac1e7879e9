//! Core tracking logic.
//!
//! This module contains:
//! - EventTracker: the authoritative event collection
//! - Listeners: synchronous update fan-out
//! - Clock: time sources for event timestamps

pub mod clock;
pub mod listeners;
pub mod tracker;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use listeners::{ListenerId, ListenerRegistry, Subscription};
pub use tracker::{EventTracker, TrackerError};
