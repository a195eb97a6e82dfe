//! Canvas documents in the flow-editor shape, where each node's `data` bag
//! carries its kind, its caption and its configuration side by side.

use super::{Graph, GraphEdge, GraphNode, IntoGraph, NodeConfig, Position};
use crate::error::GraphConversionError;
use ahash::AHashSet;
use serde::Deserialize;
use serde_json::Value;

/// Node as stored by the flow editor.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasNode {
    pub id: String,
    #[serde(default)]
    pub position: Option<Position>,
    /// `{type, label?, ...config}`.
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CanvasEdge {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
}

/// Complete flow-editor document.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasDocument {
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
}

impl IntoGraph for CanvasDocument {
    fn into_graph(self) -> Result<Graph, GraphConversionError> {
        let mut graph = Graph::default();
        let mut seen = AHashSet::new();

        for node in self.nodes {
            if !seen.insert(node.id.clone()) {
                return Err(GraphConversionError::ValidationError(format!(
                    "Duplicate node id '{}'",
                    node.id
                )));
            }
            graph.add_node(convert_node(node)?);
        }

        for edge in self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint) {
                    return Err(GraphConversionError::ValidationError(format!(
                        "Edge {} -> {} references unknown node '{}'",
                        edge.source, edge.target, endpoint
                    )));
                }
            }
            let mut converted = GraphEdge::new(edge.source, edge.target);
            if let Some(id) = edge.id {
                converted = converted.with_id(id);
            }
            graph.edges.push(converted);
        }

        Ok(graph)
    }
}

fn convert_node(node: CanvasNode) -> Result<GraphNode, GraphConversionError> {
    let Value::Object(mut data) = node.data else {
        return Err(GraphConversionError::ValidationError(format!(
            "Node '{}' has no data object",
            node.id
        )));
    };

    let kind = match data.remove("type") {
        Some(Value::String(kind)) => kind,
        _ => {
            return Err(GraphConversionError::ValidationError(format!(
                "Node '{}' does not declare a type",
                node.id
            )));
        }
    };
    let label = match data.remove("label") {
        Some(Value::String(label)) => Some(label),
        _ => None,
    };

    let config = NodeConfig::from_parts(&node.id, &kind, Value::Object(data))?;
    Ok(GraphNode {
        id: node.id,
        config,
        position: node.position,
        label,
    })
}
