//! pipeviz - Pipeline event tracker and graph projector
//!
//! Records the lifecycle of operations in a running pipeline and projects
//! them into a positioned graph a visualizer can draw.
//!
//! # Architecture
//!
//! - The tracker owns an ordered, id-indexed set of event records and
//!   notifies listeners with a fresh snapshot after every mutation
//! - Event types map a category string to a display definition, with
//!   caller definitions layered over built-in defaults
//! - Layout is a pure projection from a snapshot to nodes and edges
//!
//! # Modules
//!
//! - `core`: Event tracker, listener registry, clocks
//! - `domain`: Data structures (EventRecord, EventTypeDefinition)
//! - `layout`: Snapshot to graph projection (flat and grouped)
//! - `render`: Text, JSON, DOT and Mermaid output
//! - `script`: Scripted pipelines and playback
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Play the demo pipeline and print the final tree
//! pipeviz run demo --instant
//!
//! # Watch a failing pipeline in real time, rendered as Mermaid
//! pipeviz run failure --follow --format mermaid
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod layout;
pub mod render;
pub mod script;

// Re-export main types at crate root for convenience
pub use core::{EventTracker, Subscription, TrackerError};
pub use domain::{EventConfig, EventRecord, EventStatus, EventTypeConfig, TypeRegistry};
pub use layout::{project, Graph, LayoutConfig, LayoutStrategy};
pub use script::{Script, ScriptPlayer};
