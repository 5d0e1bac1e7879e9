//! Event records tracked by the visualizer.
//!
//! A record is one unit of work in a pipeline. Records are created running,
//! mutated by progress updates, and finish as completed or failed.

use serde::{Deserialize, Serialize};

/// Pipeline id used for events that don't name one
pub const DEFAULT_PIPELINE: &str = "default";

/// A single tracked event.
///
/// Parent and children are stored as ids. Resolve them through the tracker
/// that owns the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Caller-supplied unique id
    pub id: String,

    /// Display label
    pub name: String,

    /// Category key used to look up the type definition
    #[serde(rename = "type")]
    pub event_type: String,

    /// Lane this event is drawn in
    pub pipeline_id: Option<String>,

    /// Current lifecycle status
    pub status: EventStatus,

    /// Progress percentage (0-100)
    pub progress: u8,

    /// When the event started (ms)
    pub start_time: i64,

    /// When the event finished (ms)
    pub end_time: Option<i64>,

    /// Error message for failed events
    pub error: Option<String>,

    /// Latest status note from a progress update
    pub message: Option<String>,

    /// Id of the parent event
    pub parent: Option<String>,

    /// Ids of child events, in creation order
    pub children: Vec<String>,
}

impl EventRecord {
    /// Create a running record with zero progress
    pub fn new(id: impl Into<String>, config: EventConfig, start_time: i64) -> Self {
        Self {
            id: id.into(),
            name: config.name,
            event_type: config.event_type,
            pipeline_id: config.pipeline_id,
            status: EventStatus::Running,
            progress: 0,
            start_time,
            end_time: None,
            error: None,
            message: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Pipeline this event belongs to, falling back to [`DEFAULT_PIPELINE`]
    pub fn pipeline(&self) -> &str {
        self.pipeline_id.as_deref().unwrap_or(DEFAULT_PIPELINE)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Completed or failed
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Elapsed time between start and end, once finished
    pub fn duration_ms(&self) -> Option<u64> {
        self.end_time
            .map(|end| end.saturating_sub(self.start_time).max(0) as u64)
    }
}

/// Everything needed to start an event except its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub pipeline_id: Option<String>,

    #[serde(default)]
    pub parent_id: Option<String>,
}

impl EventConfig {
    pub fn new(name: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event_type: event_type.into(),
            pipeline_id: None,
            parent_id: None,
        }
    }

    /// Place the event in a named pipeline
    pub fn in_pipeline(mut self, pipeline_id: impl Into<String>) -> Self {
        self.pipeline_id = Some(pipeline_id.into());
        self
    }

    /// Link the event under an existing parent
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Declared for producers that queue work; the tracker never sets it
    Pending,

    /// Currently executing
    Running,

    /// Finished successfully
    Completed,

    /// Finished with an error
    Failed,
}

impl EventStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Lowercase label, as used in serialized output
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl Default for EventStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
