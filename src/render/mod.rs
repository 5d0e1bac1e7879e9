//! Renderers for projected graphs.
//!
//! Turns a [`Graph`] into something a person or another tool can look at:
//! an indented text tree, JSON for a graph widget, Graphviz DOT or Mermaid.

pub mod dot;
pub mod follow;
pub mod mermaid;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::EventStatus;
use crate::layout::Graph;

pub use follow::{FitView, ViewFollow};

/// Output format for a rendered graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderFormat {
    #[default]
    Text,
    Json,
    Dot,
    Mermaid,
}

/// Render a graph in the given format
pub fn render(graph: &Graph, format: RenderFormat) -> Result<String> {
    match format {
        RenderFormat::Text => Ok(text(graph)),
        RenderFormat::Json => {
            serde_json::to_string_pretty(graph).context("Failed to serialize graph")
        }
        RenderFormat::Dot => Ok(dot::render(graph)),
        RenderFormat::Mermaid => Ok(mermaid::render(graph)),
    }
}

/// Single-character status marker
pub fn status_glyph(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Pending => "·",
        EventStatus::Running => "⟳",
        EventStatus::Completed => "✓",
        EventStatus::Failed => "✗",
    }
}

/// Fill colour per status, shared by the diagram renderers
pub(crate) fn status_color(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Pending => "#6b7280",
        EventStatus::Running => "#3b82f6",
        EventStatus::Completed => "#10b981",
        EventStatus::Failed => "#ef4444",
    }
}

/// Indented tree, one line per node
pub fn text(graph: &Graph) -> String {
    if graph.is_empty() {
        return "(no events)\n".to_string();
    }

    let mut out = String::new();
    let mut current_pipeline: Option<&str> = None;

    for node in &graph.nodes {
        if let Some(summary) = node.as_group() {
            out.push_str(&format!(
                "▸ {} [{}] {} event(s)\n",
                summary.pipeline_id, summary.status, summary.event_count
            ));
            current_pipeline = Some(node.pipeline_id.as_str());
            continue;
        }

        let Some(data) = node.as_event() else {
            continue;
        };

        // Roots start a lane; children inherit whatever lane their parent is drawn in
        if node.level == 0 && current_pipeline != Some(node.pipeline_id.as_str()) {
            out.push_str(&format!("▸ {}\n", node.pipeline_id));
            current_pipeline = Some(node.pipeline_id.as_str());
        }

        let event = &data.event;
        let mut line = format!(
            "{}{} {} ({}) {}%",
            "  ".repeat(node.level + 1),
            status_glyph(event.status),
            event.name,
            data.definition.name,
            event.progress
        );
        if let Some(ref error) = event.error {
            line.push_str(&format!(" error: {}", error));
        } else if let Some(ref message) = event.message {
            line.push_str(&format!(" {}", message));
        }
        if let Some(ms) = event.duration_ms() {
            line.push_str(&format!(" [{}ms]", ms));
        }
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Escape a label for a double-quoted diagram string
pub(crate) fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventConfig, EventRecord, TypeRegistry};
    use crate::layout::{project, LayoutConfig, LayoutStrategy};

    fn sample() -> Vec<EventRecord> {
        let mut root = EventRecord::new("load", EventConfig::new("Load Data", "file-operation").in_pipeline("demo"), 0);
        root.children.push("parse".to_string());
        root.status = EventStatus::Completed;
        root.progress = 100;
        root.end_time = Some(250);

        let mut child = EventRecord::new(
            "parse",
            EventConfig::new("Parse", "data-processing")
                .in_pipeline("demo")
                .with_parent("load"),
            100,
        );
        child.parent = Some("load".to_string());
        child.progress = 40;
        child.message = Some("Parsing...".to_string());
        vec![root, child]
    }

    #[test]
    fn test_text_tree() {
        let graph = project(&sample(), &LayoutConfig::default(), &TypeRegistry::default());
        let out = text(&graph);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "▸ demo");
        assert_eq!(lines[1], "  ✓ Load Data (File Operation) 100% [250ms]");
        assert_eq!(lines[2], "    ⟳ Parse (Data Processing) 40% Parsing...");
    }

    #[test]
    fn test_text_with_groups() {
        let config = LayoutConfig::default().with_strategy(LayoutStrategy::Grouped);
        let graph = project(&sample(), &config, &TypeRegistry::default());
        let out = text(&graph);

        assert!(out.starts_with("▸ demo [running] 2 event(s)\n"));
        assert_eq!(out.matches("▸ demo").count(), 1);
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(text(&Graph::default()), "(no events)\n");
    }

    #[test]
    fn test_json_output() {
        let graph = project(&sample(), &LayoutConfig::default(), &TypeRegistry::default());
        let json = render(&graph, RenderFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["nodes"][0]["data"]["kind"], "event");
        assert_eq!(value["edges"][0]["id"], "load-parse");
        assert_eq!(value["edges"][0]["animated"], true);
    }
}
