//! Graphviz DOT output.
//!
//! Node positions are pinned (`pos="x,y!"`) so `neato -n` reproduces the
//! projected layout; plain `dot` ignores them and lays out on its own.

use std::fmt::Write;

use crate::layout::{Graph, Node};

use super::{escape, status_color, status_glyph};

pub fn render(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str("digraph pipeline {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box, style=\"rounded,filled\", fontname=\"Helvetica\"];\n");

    let mut cluster = 0usize;
    let mut open_cluster = false;

    for node in &graph.nodes {
        if let Some(summary) = node.as_group() {
            if open_cluster {
                out.push_str("  }\n");
            }
            let _ = writeln!(out, "  subgraph cluster_{} {{", cluster);
            let _ = writeln!(
                out,
                "    label=\"{} ({}, {} events)\";",
                escape(&summary.pipeline_id),
                summary.status,
                summary.event_count
            );
            let _ = writeln!(out, "    style=dashed; color=\"{}\";", status_color(summary.status));
            cluster += 1;
            open_cluster = true;
            continue;
        }

        let indent = if open_cluster { "    " } else { "  " };
        write_event_node(&mut out, indent, node);
    }
    if open_cluster {
        out.push_str("  }\n");
    }

    for edge in &graph.edges {
        let style = if edge.animated { "dashed" } else { "solid" };
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [style={}, color=\"{}\"];",
            escape(&edge.source),
            escape(&edge.target),
            style,
            edge.stroke
        );
    }

    out.push_str("}\n");
    out
}

fn write_event_node(out: &mut String, indent: &str, node: &Node) {
    let Some(data) = node.as_event() else {
        return;
    };
    let event = &data.event;

    let label = format!(
        "{} {}\\n{} · {}%",
        status_glyph(event.status),
        escape(&event.name),
        escape(&data.definition.name),
        event.progress
    );
    let _ = writeln!(
        out,
        "{}\"{}\" [label=\"{}\", color=\"{}\", fillcolor=\"{}\", pos=\"{},{}!\"];",
        indent,
        escape(&node.id),
        label,
        status_color(event.status),
        data.definition.color.background,
        node.position.x,
        -node.position.y
    );
}
