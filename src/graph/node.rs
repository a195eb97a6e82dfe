use super::config::NodeConfig;
use crate::error::GraphConversionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Canvas coordinate of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `(0, 0)` is the editor's "not placed yet" marker.
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Every node kind this crate knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Entity,
    Filter,
    Link,
    Transform,
    Aggregate,
    Sheet,
    Export,
    Concatenate,
    Pivot,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Entity => "entity",
            NodeKind::Filter => "filter",
            NodeKind::Link => "link",
            NodeKind::Transform => "transform",
            NodeKind::Aggregate => "aggregate",
            NodeKind::Sheet => "sheet",
            NodeKind::Export => "export",
            NodeKind::Concatenate => "concatenate",
            NodeKind::Pivot => "pivot",
        }
    }

    /// Parses a wire kind name. The palette calls link nodes `join`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "entity" => Some(NodeKind::Entity),
            "filter" => Some(NodeKind::Filter),
            "link" | "join" => Some(NodeKind::Link),
            "transform" => Some(NodeKind::Transform),
            "aggregate" => Some(NodeKind::Aggregate),
            "sheet" => Some(NodeKind::Sheet),
            "export" => Some(NodeKind::Export),
            "concatenate" => Some(NodeKind::Concatenate),
            "pivot" => Some(NodeKind::Pivot),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the editable graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGraphNode", into = "RawGraphNode")]
pub struct GraphNode {
    pub id: String,
    pub config: NodeConfig,
    pub position: Option<Position>,
    /// Canvas caption. Never compiled.
    pub label: Option<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, config: impl Into<NodeConfig>) -> Self {
        Self {
            id: id.into(),
            config: config.into(),
            position: None,
            label: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.config.kind()
    }

    pub fn kind_name(&self) -> &str {
        self.config.kind_name()
    }

    /// True when the node has no position or sits at the origin.
    pub fn needs_layout(&self) -> bool {
        self.position.is_none_or(|p| p.is_origin())
    }
}

/// Wire shape of a [`GraphNode`]: the kind travels next to an untyped config body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawGraphNode {
    id: String,
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    config: Value,
}

impl TryFrom<RawGraphNode> for GraphNode {
    type Error = GraphConversionError;

    fn try_from(raw: RawGraphNode) -> Result<Self, Self::Error> {
        let config = NodeConfig::from_parts(&raw.id, &raw.kind, raw.config)?;
        Ok(GraphNode {
            id: raw.id,
            config,
            position: raw.position,
            label: raw.label,
        })
    }
}

impl From<GraphNode> for RawGraphNode {
    fn from(node: GraphNode) -> Self {
        let (kind, config) = node.config.into_parts();
        RawGraphNode {
            id: node.id,
            kind,
            position: node.position,
            label: node.label,
            config,
        }
    }
}
