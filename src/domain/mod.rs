//! Domain types for the pipeline visualizer.
//!
//! This module contains the core data structures:
//! - EventRecord: one tracked unit of work
//! - Type definitions: presentation metadata per event category

pub mod event;
pub mod types;

// Re-export commonly used types
pub use event::{EventConfig, EventRecord, EventStatus, DEFAULT_PIPELINE};
pub use types::{
    ColorScheme, EventTypeConfig, EventTypeDefinition, EventTypeSpec, Icon, IconBackground,
    NodeStyleDefinition, TypeRegistry, TypeStyle, FALLBACK_EVENT_TYPE,
};
