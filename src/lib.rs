//! # reportgraph - Report Graph Compiler
//!
//! **reportgraph** turns the node graph a user draws in a visual report
//! builder into a versioned, self-describing report definition, and turns a
//! stored definition back into an editable graph. A structural validator
//! gates the editor and an auto-layout pass places nodes that have no stored
//! position.
//!
//! ## Core Workflow
//!
//! The crate is format-agnostic. It operates on a canonical [`graph::Graph`]
//! of typed nodes and directed edges:
//!
//! 1.  **Load Your Canvas**: Parse your editor's document into your own Rust
//!     structs, or use the bundled [`graph::CanvasDocument`] shape.
//! 2.  **Convert to a Graph**: Implement [`graph::IntoGraph`] for your document.
//! 3.  **Validate**: [`validate`] reports structural errors (missing entity,
//!     cycles) and warnings such as disconnected nodes. Edges pointing at
//!     unknown nodes are caught by [`definition::check_definition`] on a
//!     compiled document.
//! 4.  **Compile**: [`compiler::Compiler`] produces a
//!     [`definition::ReportDefinition`]; passing the prior definition's metadata
//!     keeps the report's identity and bumps its version.
//! 5.  **Reopen**: [`decompile`] rebuilds the graph for editing.
//!
//! ## Quick Start
//!
//! ```rust
//! use reportgraph::prelude::*;
//!
//! let mut graph = Graph::default();
//! graph
//!     .add_node(GraphNode::new(
//!         "accounts",
//!         EntityConfig {
//!             entity: Some("account".to_string()),
//!             attributes: Some(vec!["name".to_string(), "revenue".to_string()]),
//!             ..EntityConfig::default()
//!         },
//!     ))
//!     .add_node(GraphNode::new(
//!         "sheet",
//!         SheetConfig {
//!             name: Some("Accounts".to_string()),
//!             columns: Some(vec![UiColumn::new("name"), UiColumn::new("revenue")]),
//!             ..SheetConfig::default()
//!         },
//!     ))
//!     .connect("accounts", "sheet");
//!
//! let report = validate(&graph.nodes, &graph.edges);
//! assert!(report.is_valid);
//!
//! let definition = reportgraph::compile(&graph.nodes, &graph.edges, None);
//! assert_eq!(definition.primary_entity, "account");
//! assert_eq!(definition.report_version, 1);
//!
//! let reopened = decompile(&definition).unwrap();
//! assert_eq!(reopened.nodes.len(), 2);
//! ```

pub mod auto_layout;
pub mod clock;
pub mod compiler;
pub mod decompiler;
pub mod definition;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod prelude;
pub mod sample;
pub mod store;
pub mod validation;

pub use decompiler::decompile;
pub use sample::{create_blank, create_sample};
pub use validation::validate;

use definition::{DefinitionMetadata, ReportDefinition};
use graph::{GraphEdge, GraphNode};

/// Compiles a graph with the system clock and random ids.
///
/// Use [`compiler::Compiler::builder`] to inject a clock or id source.
pub fn compile(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    prior: Option<&DefinitionMetadata>,
) -> ReportDefinition {
    compiler::Compiler::default().compile(nodes, edges, prior)
}
