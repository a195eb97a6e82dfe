use thiserror::Error;

/// Errors raised while turning a stored report definition back into an editable graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompileError {
    #[error("Link node '{node_id}' has no relation data; the report definition is malformed")]
    MissingRelation { node_id: String },
}

/// Errors that fail a whole import batch. Problems with individual records are
/// reported through `ImportOutcome::errors` instead.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to parse import file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid import file format: {0}")]
    InvalidFormat(String),
}

/// Errors surfaced by the report storage collaborators.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report '{id}': {source}")]
    Serialization {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur when converting a host canvas format into a [`Graph`](crate::graph::Graph).
#[derive(Error, Debug, Clone)]
pub enum GraphConversionError {
    #[error("Invalid canvas data: {0}")]
    ValidationError(String),

    #[error("Node '{node_id}' has an invalid configuration for kind '{kind}': {message}")]
    InvalidConfig {
        node_id: String,
        kind: String,
        message: String,
    },
}
