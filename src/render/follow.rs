//! View-follow heuristic for interactive front ends.
//!
//! Presentational only: it remembers how many nodes were last seen and asks
//! the viewer to refit when the graph grows. It never affects positions.

use serde::{Deserialize, Serialize};

use crate::layout::Graph;

/// Request to fit the viewport around all visible nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitView {
    pub padding: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for FitView {
    fn default() -> Self {
        Self {
            padding: 0.2,
            min_zoom: 0.1,
            max_zoom: 1.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewFollow {
    previous_node_count: usize,
    fit: FitView,
}

impl ViewFollow {
    pub fn new(fit: FitView) -> Self {
        Self {
            previous_node_count: 0,
            fit,
        }
    }

    /// Record a new graph; returns a fit request if it has more nodes
    /// than the previous one.
    pub fn observe(&mut self, graph: &Graph) -> Option<FitView> {
        let count = graph.nodes.len();
        let grew = count > self.previous_node_count;
        self.previous_node_count = count;
        grew.then_some(self.fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventConfig, EventRecord, TypeRegistry};
    use crate::layout::{project, LayoutConfig};

    #[test]
    fn test_fit_only_when_growing() {
        let types = TypeRegistry::default();
        let config = LayoutConfig::default();
        let one = vec![EventRecord::new("a", EventConfig::new("A", "x"), 0)];
        let two = vec![
            EventRecord::new("a", EventConfig::new("A", "x"), 0),
            EventRecord::new("b", EventConfig::new("B", "x"), 0),
        ];

        let mut follow = ViewFollow::default();
        assert_eq!(follow.observe(&project(&one, &config, &types)), Some(FitView::default()));
        assert_eq!(follow.observe(&project(&one, &config, &types)), None);
        assert!(follow.observe(&project(&two, &config, &types)).is_some());
        assert_eq!(follow.observe(&Graph::default()), None);
    }

    #[test]
    fn test_custom_fit() {
        let fit = FitView {
            padding: 0.5,
            min_zoom: 0.2,
            max_zoom: 2.0,
        };
        let one = vec![EventRecord::new("a", EventConfig::new("A", "x"), 0)];
        let graph = project(&one, &LayoutConfig::default(), &TypeRegistry::default());

        let mut follow = ViewFollow::new(fit);
        assert_eq!(follow.observe(&graph), Some(fit));
    }
}
