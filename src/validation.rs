//! Structural validation: required node kinds, connectivity and acyclicity.
//!
//! Only ids, kind names and edge endpoints matter here, so the same checks run
//! on the editable graph and on a compiled definition's embedded graph.

use crate::definition::{ReportDefinition, ReportGraphEdge, ReportGraphNode};
use crate::graph::{GraphEdge, GraphNode};
use ahash::{AHashMap, AHashSet};
use serde::Serialize;

/// The id and kind of a node, as far as structure is concerned.
pub trait StructuralNode {
    fn node_id(&self) -> &str;
    fn kind_name(&self) -> &str;
}

/// The endpoints of a directed edge.
pub trait StructuralEdge {
    fn source_id(&self) -> &str;
    fn target_id(&self) -> &str;
}

impl StructuralNode for GraphNode {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn kind_name(&self) -> &str {
        GraphNode::kind_name(self)
    }
}

impl StructuralNode for ReportGraphNode {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn kind_name(&self) -> &str {
        self.data.kind_name()
    }
}

impl StructuralEdge for GraphEdge {
    fn source_id(&self) -> &str {
        &self.source
    }

    fn target_id(&self) -> &str {
        &self.target
    }
}

impl StructuralEdge for ReportGraphEdge {
    fn source_id(&self) -> &str {
        &self.from
    }

    fn target_id(&self) -> &str {
        &self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Blocking problems.
    pub errors: Vec<String>,
    /// Advisory problems; never affect `is_valid`.
    pub warnings: Vec<String>,
}

/// Runs every structural check; none short-circuits another.
pub fn validate<N: StructuralNode, E: StructuralEdge>(nodes: &[N], edges: &[E]) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let count_kind = |kind: &str| nodes.iter().filter(|n| n.kind_name() == kind).count();
    if count_kind("entity") == 0 {
        errors.push("At least one entity node is required".to_string());
    }
    if count_kind("sheet") == 0 {
        warnings.push("No sheet nodes found - add sheets to define output format".to_string());
    }
    if count_kind("export") == 0 {
        warnings
            .push("No export node found - add an export node to define output format".to_string());
    }

    if nodes.len() > 1 {
        let connected: AHashSet<&str> = edges
            .iter()
            .flat_map(|e| [e.source_id(), e.target_id()])
            .collect();
        for node in nodes {
            if !connected.contains(node.node_id()) {
                warnings.push(format!("Node {} is not connected to the flow", node.node_id()));
            }
        }
    }

    if has_cycle(nodes, edges) {
        errors.push("Flow contains cycles - this is not allowed".to_string());
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Validates the graph embedded in a compiled definition.
pub fn validate_definition(definition: &ReportDefinition) -> ValidationReport {
    validate(&definition.graph.nodes, &definition.graph.edges)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnStack,
    Done,
}

/// True when some node reaches itself through outgoing edges. A self-loop is
/// a cycle of length one.
///
/// Depth-first search with an explicit stack, so arbitrarily long chains do
/// not exhaust the call stack.
pub fn has_cycle<N: StructuralNode, E: StructuralEdge>(nodes: &[N], edges: &[E]) -> bool {
    let mut adjacency: AHashMap<&str, Vec<&str>> = AHashMap::new();
    for edge in edges {
        adjacency
            .entry(edge.source_id())
            .or_default()
            .push(edge.target_id());
    }

    let roots = nodes
        .iter()
        .map(|n| n.node_id())
        .chain(edges.iter().map(|e| e.source_id()));

    let mut visits: AHashMap<&str, Visit> = AHashMap::new();
    for root in roots {
        if visits.contains_key(root) {
            continue;
        }
        visits.insert(root, Visit::OnStack);
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];

        while let Some(&(node, next_child)) = stack.last() {
            let child = adjacency
                .get(node)
                .and_then(|children| children.get(next_child))
                .copied();

            match child {
                Some(child) => {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    match visits.get(child) {
                        Some(Visit::OnStack) => return true,
                        Some(Visit::Done) => {}
                        None => {
                            visits.insert(child, Visit::OnStack);
                            stack.push((child, 0));
                        }
                    }
                }
                None => {
                    visits.insert(node, Visit::Done);
                    stack.pop();
                }
            }
        }
    }

    false
}
