//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! reportgraph crate. Import it to build, validate, compile and reopen graphs
//! without importing each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use reportgraph::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let canvas_json = std::fs::read_to_string("path/to/canvas.json")?;
//! let canvas: CanvasDocument = serde_json::from_str(&canvas_json)?;
//! let graph = canvas.into_graph()?;
//!
//! let report = validate(&graph.nodes, &graph.edges);
//! if !report.is_valid {
//!     return Err(report.errors.join("; ").into());
//! }
//!
//! let definition = Compiler::default().compile(&graph.nodes, &graph.edges, None);
//! println!("{}", serde_json::to_string_pretty(&definition)?);
//! # Ok(())
//! # }
//! ```

// Compilation and decompilation
pub use crate::compiler::{Compiler, CompilerBuilder};
pub use crate::decompiler::decompile;
pub use crate::validation::{ValidationReport, validate, validate_definition};

// Editor graph
pub use crate::graph::{
    AggregateConfig, CanvasDocument, EntityConfig, ExportConfig, FilterConfig, Graph, GraphEdge,
    GraphNode, IntoGraph, LinkConfig, NodeConfig, NodeKind, PivotConfig, Position, SheetConfig,
    TransformConfig, UiColumn, UiCondition, UiRelation,
};

// Stored documents
pub use crate::definition::{DefinitionMetadata, ReportDefinition};

// Time and identity
pub use crate::clock::{Clock, IdSource};

// Storage
pub use crate::store::{FileStore, MemoryStore, ReportLibrary, ReportStore};

// Error types
pub use crate::error::{DecompileError, GraphConversionError, ImportError, StoreError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
