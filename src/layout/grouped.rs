//! Grouped layout: pipelines sorted by id, each drawn on top of a
//! non-interactive group node that summarizes its status.

use crate::domain::{EventRecord, TypeRegistry};

use super::graph::{Graph, Node, NodeData, PipelineSummary, Position, Size};
use super::placement::{partition, Placer};
use super::LayoutConfig;

/// Nominal event node footprint, used to size group backgrounds
pub const NODE_WIDTH: f64 = 280.0;
pub const NODE_HEIGHT: f64 = 160.0;

/// Margin between a group's border and its events
pub const GROUP_PADDING: f64 = 40.0;

/// Id of the group node drawn behind a pipeline
pub fn group_node_id(pipeline_id: &str) -> String {
    format!("group:{}", pipeline_id)
}

pub fn project(events: &[EventRecord], config: &LayoutConfig, types: &TypeRegistry) -> Graph {
    let mut pipelines = partition(events);
    pipelines.sort_by(|a, b| a.0.cmp(b.0));

    let mut placer = Placer::new(events, config, types);
    let mut offset = config.origin.y;

    for (pipeline_id, members) in pipelines {
        let slot = placer.nodes.len();
        let extent = placer.place_pipeline(&members, offset);

        let (right, bottom) = extent.map_or((config.origin.x, offset), |e| (e.right, e.bottom));
        let size = Size {
            width: right - config.origin.x + NODE_WIDTH + 2.0 * GROUP_PADDING,
            height: bottom - offset + NODE_HEIGHT + 2.0 * GROUP_PADDING,
        };
        let position = Position {
            x: config.origin.x - GROUP_PADDING,
            y: offset - GROUP_PADDING,
        };

        let group = Node {
            id: group_node_id(pipeline_id),
            position,
            level: 0,
            pipeline_id: pipeline_id.to_string(),
            interactive: false,
            size: Some(size),
            data: NodeData::Group(PipelineSummary::from_events(pipeline_id, &members)),
        };
        placer.nodes.insert(slot, group);

        // Next group's top border must clear this group's bottom border
        let below = position.y + size.height + 2.0 * GROUP_PADDING;
        offset = (offset + config.pipeline_spacing).max(below);
    }

    placer.finish()
}
