use super::Graph;
use crate::error::GraphConversionError;

/// A trait for host canvas formats that can be converted into a [`Graph`].
///
/// Editors rarely store nodes in exactly this crate's shape. Implementing
/// `IntoGraph` on the editor's own document type gives the compiler and
/// validator a single entry point regardless of where the graph came from.
///
/// # Example
///
/// ```rust
/// use reportgraph::prelude::*;
/// use reportgraph::error::GraphConversionError;
///
/// struct Pipeline {
///     steps: Vec<(String, String)>,
/// }
///
/// impl IntoGraph for Pipeline {
///     fn into_graph(self) -> std::result::Result<Graph, GraphConversionError> {
///         let mut graph = Graph::default();
///         for (id, entity) in self.steps {
///             graph.add_node(GraphNode::new(
///                 id,
///                 EntityConfig {
///                     entity: Some(entity),
///                     ..EntityConfig::default()
///                 },
///             ));
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the document and converts it into an editable graph.
    fn into_graph(self) -> Result<Graph, GraphConversionError>;
}

impl IntoGraph for Graph {
    fn into_graph(self) -> Result<Graph, GraphConversionError> {
        Ok(self)
    }
}
