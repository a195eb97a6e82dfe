//! Deterministic placement of nodes that have no canvas position yet.

use crate::graph::{GraphNode, Position};
use itertools::Itertools;

/// Left-to-right column order of the report pipeline.
pub const PIPELINE_ORDER: [&str; 6] = ["entity", "filter", "link", "transform", "sheet", "export"];

const MARGIN: f64 = 50.0;
const COLUMN_SPACING: f64 = 300.0;
const ROW_SPACING: f64 = 150.0;

/// Places every node that [needs layout](GraphNode::needs_layout).
///
/// Nodes are grouped by kind, one column per kind in [`PIPELINE_ORDER`],
/// stacked top to bottom in encounter order. Kinds outside that order get
/// columns after it, in order of first appearance. Already placed nodes keep
/// their position and take no slot; a kind with nothing to place takes no
/// column.
pub fn auto_layout(nodes: &mut [GraphNode]) {
    let extra_kinds: Vec<String> = nodes
        .iter()
        .map(|n| n.kind_name())
        .filter(|kind| !PIPELINE_ORDER.contains(kind))
        .unique()
        .map(str::to_string)
        .collect();

    let mut column = 0usize;
    for kind in PIPELINE_ORDER
        .iter()
        .copied()
        .chain(extra_kinds.iter().map(String::as_str))
    {
        let pending: Vec<usize> = nodes
            .iter()
            .positions(|n| n.kind_name() == kind && n.needs_layout())
            .collect();
        if pending.is_empty() {
            continue;
        }

        let x = MARGIN + column as f64 * COLUMN_SPACING;
        for (row, index) in pending.into_iter().enumerate() {
            nodes[index].position = Some(Position::new(x, MARGIN + row as f64 * ROW_SPACING));
        }
        column += 1;
    }
}
