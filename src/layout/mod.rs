//! Layout projection: event snapshot -> positioned node/edge graph.
//!
//! Projection is a pure function of the events, the [`LayoutConfig`] and
//! the [`TypeRegistry`]. Two strategies exist:
//! - `Flat`: pipelines stacked in first-seen order
//! - `Grouped`: pipelines sorted by id, each behind a summary group node

pub mod flat;
pub mod graph;
pub mod grouped;
mod placement;

use serde::{Deserialize, Serialize};

use crate::domain::{EventRecord, TypeRegistry};

pub use graph::{
    aggregate_status, Edge, EdgeKind, EventNodeData, Graph, Node, NodeData, PipelineSummary,
    Position, Size,
};

/// Horizontal and vertical distance between nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub x: f64,
    pub y: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self { x: 300.0, y: 200.0 }
    }
}

/// Which placement strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    #[default]
    Flat,
    Grouped,
}

impl std::str::FromStr for LayoutStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "grouped" => Ok(Self::Grouped),
            other => anyhow::bail!("Unknown layout strategy: {}", other),
        }
    }
}

/// Layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Distance between levels (x) and between siblings (y)
    #[serde(default)]
    pub node_spacing: Spacing,

    /// Minimum vertical distance between pipeline origins (default: 300)
    #[serde(default = "default_pipeline_spacing")]
    pub pipeline_spacing: f64,

    /// Where the first pipeline's first root goes (default: 60, 30)
    #[serde(default = "default_origin")]
    pub origin: Position,

    #[serde(default)]
    pub strategy: LayoutStrategy,
}

fn default_pipeline_spacing() -> f64 {
    300.0
}

fn default_origin() -> Position {
    Position { x: 60.0, y: 30.0 }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: Spacing::default(),
            pipeline_spacing: default_pipeline_spacing(),
            origin: default_origin(),
            strategy: LayoutStrategy::default(),
        }
    }
}

impl LayoutConfig {
    pub fn with_strategy(mut self, strategy: LayoutStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Project a snapshot into a graph using the configured strategy
pub fn project(events: &[EventRecord], config: &LayoutConfig, types: &TypeRegistry) -> Graph {
    match config.strategy {
        LayoutStrategy::Flat => flat::project(events, config, types),
        LayoutStrategy::Grouped => grouped::project(events, config, types),
    }
}
