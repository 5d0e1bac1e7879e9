//! Mermaid flowchart output.

use std::collections::HashMap;
use std::fmt::Write;

use crate::domain::EventStatus;
use crate::layout::Graph;

use super::{status_color, status_glyph};

/// Mermaid ids must be plain identifiers, so nodes are renamed `n0`, `n1`...
pub fn render(graph: &Graph) -> String {
    let aliases: HashMap<&str, String> = graph
        .event_nodes()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), format!("n{}", i)))
        .collect();

    let mut out = String::from("flowchart TD\n");
    let mut open_subgraph = false;
    let mut group_index = 0usize;

    for node in &graph.nodes {
        if let Some(summary) = node.as_group() {
            if open_subgraph {
                out.push_str("  end\n");
            }
            let _ = writeln!(
                out,
                "  subgraph g{}[\"{} ({})\"]",
                group_index,
                label(&summary.pipeline_id),
                summary.status
            );
            group_index += 1;
            open_subgraph = true;
            continue;
        }

        let (Some(data), Some(alias)) = (node.as_event(), aliases.get(node.id.as_str())) else {
            continue;
        };
        let event = &data.event;
        let indent = if open_subgraph { "    " } else { "  " };
        let _ = writeln!(
            out,
            "{}{}[\"{} {}<br/>{} · {}%\"]:::{}",
            indent,
            alias,
            status_glyph(event.status),
            label(&event.name),
            label(&data.definition.name),
            event.progress,
            event.status
        );
    }
    if open_subgraph {
        out.push_str("  end\n");
    }

    for edge in &graph.edges {
        let (Some(source), Some(target)) = (
            aliases.get(edge.source.as_str()),
            aliases.get(edge.target.as_str()),
        ) else {
            continue;
        };
        let arrow = if edge.animated { "-.->" } else { "-->" };
        let _ = writeln!(out, "  {} {} {}", source, arrow, target);
    }

    for status in [
        EventStatus::Pending,
        EventStatus::Running,
        EventStatus::Completed,
        EventStatus::Failed,
    ] {
        let _ = writeln!(
            out,
            "  classDef {} stroke:{},stroke-width:2px",
            status,
            status_color(status)
        );
    }

    out
}

/// Mermaid labels use HTML entities instead of backslash escapes
fn label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '#' => out.push_str("#35;"),
            '"' => out.push_str("#quot;"),
            '<' => out.push_str("#lt;"),
            '>' => out.push_str("#gt;"),
            other => out.push(other),
        }
    }
    out
}
