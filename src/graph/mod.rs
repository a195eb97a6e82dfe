//! The editable graph: what the canvas holds while a user builds a report.

pub mod canvas;
pub mod config;
pub mod conversion;
pub mod edge;
pub mod node;

pub use canvas::*;
pub use config::*;
pub use conversion::*;
pub use edge::*;
pub use node::*;

use serde::{Deserialize, Serialize};

/// An externally owned node and edge list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn add_node(&mut self, node: GraphNode) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Adds an edge with a derived id.
    pub fn connect(&mut self, source: impl Into<String>, target: impl Into<String>) -> &mut Self {
        self.edges.push(GraphEdge::new(source, target));
        self
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<GraphNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.edges.retain(|e| e.source != id && e.target != id);
        Some(self.nodes.remove(index))
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.kind() == Some(kind))
    }
}
