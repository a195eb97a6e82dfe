use serde::{Deserialize, Serialize};

/// A directed connection between two graph nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawGraphEdge")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    /// Creates an edge whose id is derived from its endpoints.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: derived_edge_id(&source, &target),
            source,
            target,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// `edge-<source>-<target>`.
pub fn derived_edge_id(source: &str, target: &str) -> String {
    format!("edge-{source}-{target}")
}

#[derive(Deserialize)]
struct RawGraphEdge {
    #[serde(default)]
    id: Option<String>,
    source: String,
    target: String,
}

impl From<RawGraphEdge> for GraphEdge {
    fn from(raw: RawGraphEdge) -> Self {
        let id = raw
            .id
            .unwrap_or_else(|| derived_edge_id(&raw.source, &raw.target));
        GraphEdge {
            id,
            source: raw.source,
            target: raw.target,
        }
    }
}
