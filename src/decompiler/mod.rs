//! Report definition → graph decompilation, for reopening a stored report in
//! the editor.

use crate::auto_layout::auto_layout;
use crate::definition::ReportDefinition;
use crate::error::DecompileError;
use crate::graph::{Graph, GraphEdge, GraphNode, derived_edge_id};

mod label;
mod mapping;

pub use label::node_label;
pub use mapping::editable_top;

/// Rebuilds an editable graph from `definition`.
///
/// Stored positions are kept as-is; nodes without one (or at the origin) are
/// placed by [`auto_layout`]. Every node gets a synthesized canvas label.
///
/// # Errors
///
/// Returns [`DecompileError::MissingRelation`] for a link node that carries no
/// relation: such a document is malformed and cannot be reopened faithfully.
pub fn decompile(definition: &ReportDefinition) -> Result<Graph, DecompileError> {
    let mut nodes = definition
        .graph
        .nodes
        .iter()
        .map(|node| {
            Ok(GraphNode {
                id: node.id.clone(),
                config: mapping::map_node(node)?,
                position: node.position,
                label: Some(node_label(node)),
            })
        })
        .collect::<Result<Vec<_>, DecompileError>>()?;

    let edges = definition
        .graph
        .edges
        .iter()
        .map(|edge| GraphEdge {
            id: edge
                .id
                .clone()
                .unwrap_or_else(|| derived_edge_id(&edge.from, &edge.to)),
            source: edge.from.clone(),
            target: edge.to.clone(),
        })
        .collect();

    auto_layout(&mut nodes);
    log::debug!(
        "Decompiled report '{}' into {} node(s)",
        definition.id,
        nodes.len()
    );

    Ok(Graph { nodes, edges })
}
