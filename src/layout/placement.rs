//! Depth-first tree placement shared by the layout strategies.

use std::collections::{HashMap, HashSet};

use crate::domain::{EventRecord, TypeRegistry};

use super::graph::{Edge, EventNodeData, Graph, Node, NodeData, Position};
use super::LayoutConfig;

/// Bounding box of the nodes placed for one pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Extent {
    pub bottom: f64,
    pub right: f64,
}

impl Extent {
    fn include(extent: &mut Option<Extent>, position: Position) {
        match extent {
            Some(e) => {
                e.bottom = e.bottom.max(position.y);
                e.right = e.right.max(position.x);
            }
            None => {
                *extent = Some(Extent {
                    bottom: position.y,
                    right: position.x,
                })
            }
        }
    }
}

/// Split events by pipeline, keeping first-seen pipeline order and
/// snapshot order within each pipeline.
pub(crate) fn partition(events: &[EventRecord]) -> Vec<(&str, Vec<&EventRecord>)> {
    let mut groups: Vec<(&str, Vec<&EventRecord>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for event in events {
        let pipeline = event.pipeline();
        let slot = *slots.entry(pipeline).or_insert_with(|| {
            groups.push((pipeline, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(event);
    }

    groups
}

/// Accumulates nodes and edges across pipelines.
///
/// Every event is placed at most once, even when a malformed snapshot
/// links it from several parents.
pub(crate) struct Placer<'a> {
    config: &'a LayoutConfig,
    types: &'a TypeRegistry,
    by_id: HashMap<&'a str, &'a EventRecord>,
    placed: HashSet<&'a str>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl<'a> Placer<'a> {
    pub fn new(events: &'a [EventRecord], config: &'a LayoutConfig, types: &'a TypeRegistry) -> Self {
        Self {
            config,
            types,
            by_id: events.iter().map(|e| (e.id.as_str(), e)).collect(),
            placed: HashSet::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Roots have no parent, or a parent missing from the snapshot
    fn is_root(&self, event: &EventRecord) -> bool {
        match event.parent.as_deref() {
            Some(parent) => !self.by_id.contains_key(parent),
            None => true,
        }
    }

    /// Place a pipeline's roots and their descendants starting at `offset`
    pub fn place_pipeline(&mut self, members: &[&'a EventRecord], offset: f64) -> Option<Extent> {
        let roots: Vec<&'a EventRecord> = members
            .iter()
            .copied()
            .filter(|e| self.is_root(e))
            .collect();

        let mut extent = None;
        self.place(&roots, offset, 0, &mut extent);
        extent
    }

    /// Place siblings at `level`, stacked down from `y`, then recurse into
    /// each one's children starting at its own row.
    ///
    /// Subtrees are not packed: a later sibling's children can land on the
    /// same spot as an earlier sibling's deeper children. Only separate
    /// pipelines are kept apart.
    fn place(
        &mut self,
        siblings: &[&'a EventRecord],
        y: f64,
        level: usize,
        extent: &mut Option<Extent>,
    ) {
        let spacing = self.config.node_spacing;

        for (index, &event) in siblings.iter().enumerate() {
            if !self.placed.insert(event.id.as_str()) {
                continue;
            }

            let position = Position {
                x: self.config.origin.x + level as f64 * spacing.x,
                y: y + index as f64 * spacing.y,
            };
            Extent::include(extent, position);
            let node = self.event_node(event, position, level);
            self.nodes.push(node);

            if let Some(parent) = event.parent.as_deref() {
                if self.by_id.contains_key(parent) {
                    self.edges.push(Edge::link(parent, event));
                }
            }

            let children: Vec<&'a EventRecord> = event
                .children
                .iter()
                .filter_map(|c| self.by_id.get(c.as_str()).copied())
                .collect();
            if !children.is_empty() {
                self.place(&children, position.y, level + 1, extent);
            }
        }
    }

    fn event_node(&self, event: &EventRecord, position: Position, level: usize) -> Node {
        Node {
            id: event.id.clone(),
            position,
            level,
            pipeline_id: event.pipeline().to_string(),
            interactive: true,
            size: None,
            data: NodeData::Event(EventNodeData {
                event: event.clone(),
                definition: self.types.definition(&event.event_type).clone(),
                node_style: self.types.node_styles().cloned(),
            }),
        }
    }

    pub fn finish(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
