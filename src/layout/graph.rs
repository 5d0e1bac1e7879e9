//! Renderable node/edge graph produced by the layout projector.

use serde::{Deserialize, Serialize};

use crate::domain::{EventRecord, EventStatus, EventTypeDefinition, NodeStyleDefinition};

/// Stroke colour used for every parent/child edge
pub const EDGE_STROKE: &str = "#6b7280";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A positioned node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub position: Position,

    /// Depth below the pipeline's roots (0 for roots and group nodes)
    pub level: usize,

    /// Pipeline the node belongs to
    pub pipeline_id: String,

    /// False for background nodes that can't be selected or dragged
    pub interactive: bool,

    /// Explicit size, set for group nodes
    pub size: Option<Size>,

    pub data: NodeData,
}

impl Node {
    pub fn as_event(&self) -> Option<&EventNodeData> {
        match &self.data {
            NodeData::Event(data) => Some(data),
            NodeData::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&PipelineSummary> {
        match &self.data {
            NodeData::Group(summary) => Some(summary),
            NodeData::Event(_) => None,
        }
    }
}

/// Render payload of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum NodeData {
    Event(EventNodeData),
    Group(PipelineSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventNodeData {
    pub event: EventRecord,
    pub definition: EventTypeDefinition,
    pub node_style: Option<NodeStyleDefinition>,
}

/// Aggregate view of one pipeline, drawn behind its events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub pipeline_id: String,
    pub event_count: usize,
    pub status: EventStatus,

    /// Ids of the pipeline's events
    pub children: Vec<String>,
}

impl PipelineSummary {
    pub fn from_events(pipeline_id: &str, events: &[&EventRecord]) -> Self {
        Self {
            pipeline_id: pipeline_id.to_string(),
            event_count: events.len(),
            status: aggregate_status(events.iter().map(|e| e.status)),
            children: events.iter().map(|e| e.id.clone()).collect(),
        }
    }
}

/// Failed if any failed, else running if any running, else completed if
/// all completed, else pending (including the empty case).
pub fn aggregate_status<I>(statuses: I) -> EventStatus
where
    I: IntoIterator<Item = EventStatus>,
{
    let mut any = false;
    let mut any_running = false;
    let mut all_completed = true;

    for status in statuses {
        any = true;
        match status {
            EventStatus::Failed => return EventStatus::Failed,
            EventStatus::Running => any_running = true,
            EventStatus::Completed => continue,
            EventStatus::Pending => {}
        }
        all_completed = false;
    }

    if any_running {
        EventStatus::Running
    } else if any && all_completed {
        EventStatus::Completed
    } else {
        EventStatus::Pending
    }
}

/// Edge drawing style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    SmoothStep,
}

/// Parent -> child link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// "{source}-{target}"
    pub id: String,
    pub source: String,
    pub target: String,

    /// Set while the child is running
    pub animated: bool,

    pub kind: EdgeKind,
    pub stroke: String,
}

impl Edge {
    pub fn link(parent: &str, child: &EventRecord) -> Self {
        Self {
            id: format!("{}-{}", parent, child.id),
            source: parent.to_string(),
            target: child.id.clone(),
            animated: child.status == EventStatus::Running,
            kind: EdgeKind::SmoothStep,
            stroke: EDGE_STROKE.to_string(),
        }
    }
}

/// Projected layout: what a renderer draws
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn event_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.as_event().is_some())
    }

    pub fn group_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.as_group().is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
