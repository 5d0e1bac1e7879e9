//! Flat layout: pipelines stacked top to bottom in first-seen order.

use crate::domain::{EventRecord, TypeRegistry};

use super::graph::Graph;
use super::placement::{partition, Placer};
use super::LayoutConfig;

pub fn project(events: &[EventRecord], config: &LayoutConfig, types: &TypeRegistry) -> Graph {
    let mut placer = Placer::new(events, config, types);
    let mut offset = config.origin.y;

    for (_, members) in partition(events) {
        let extent = placer.place_pipeline(&members, offset);

        // Never start the next lane above the lowest node of this one
        let below = extent.map_or(f64::MIN, |e| e.bottom + config.node_spacing.y);
        offset = (offset + config.pipeline_spacing).max(below);
    }

    placer.finish()
}
