//! Graph → report definition compilation.

use crate::clock::{Clock, IdSource, SystemClock, UuidSource};
use crate::definition::*;
use crate::graph::{GraphEdge, GraphNode};

mod hints;
mod mapping;

pub use hints::{DEFAULT_ROW_ESTIMATE, estimate_entity_rows};
pub use mapping::{DEFAULT_FILE_NAME, condition_label};

/// Name given to definitions compiled without one.
pub const DEFAULT_REPORT_NAME: &str = "Untitled Report";
/// Description given to definitions compiled without one.
pub const DEFAULT_DESCRIPTION: &str = "Generated from flow builder";

/// Compiles editor graphs into report definitions.
///
/// The compiler never fails: structurally broken graphs still produce a
/// best-effort definition, with problems recorded in `hints.warnings`.
/// Gating is the validator's job.
pub struct Compiler {
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
}

pub struct CompilerBuilder {
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self {
            clock: Box::new(SystemClock),
            ids: Box::new(UuidSource),
        }
    }

    /// Replaces the source of `createdAt`/`updatedAt`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the generator of ids for brand-new definitions.
    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            clock: self.clock,
            ids: self.ids,
        }
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        CompilerBuilder::new().build()
    }
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// Compiles `nodes` and `edges` into a complete definition.
    ///
    /// `prior` supplies identity and metadata to keep. Without it the result
    /// is a brand-new version 1 definition.
    pub fn compile(
        &self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        prior: Option<&DefinitionMetadata>,
    ) -> ReportDefinition {
        let mut node_warnings = Vec::new();
        let report_nodes: Vec<ReportGraphNode> = nodes
            .iter()
            .filter_map(|node| mapping::map_node(node, &mut node_warnings))
            .collect();
        let report_edges = edges
            .iter()
            .map(|edge| ReportGraphEdge {
                from: edge.source.clone(),
                to: edge.target.clone(),
                id: Some(edge.id.clone()),
            })
            .collect();

        let primary_entity = hints::primary_entity(&report_nodes)
            .unwrap_or(UNKNOWN_ENTITY)
            .to_string();
        let layout = hints::workbook_layout(&report_nodes);
        let mut report_hints = hints::build_hints(&report_nodes);
        report_hints.warnings.extend(node_warnings);
        if let Some(prior_graph) = prior.and_then(|p| p.graph.as_ref()) {
            report_hints
                .warnings
                .extend(hints::downgrade_warnings(prior_graph, &report_nodes));
        }
        for warning in &report_hints.warnings {
            log::warn!("{warning}");
        }

        let meta = prior.cloned().unwrap_or_default();
        let now = self.clock.now();
        let id = non_empty(meta.id).unwrap_or_else(|| self.ids.next_id("report"));
        let report_version = meta.report_version.unwrap_or(0) + 1;

        log::debug!(
            "Compiled report '{}' v{}: {} node(s), {} edge(s) in, {} node(s) out",
            id,
            report_version,
            nodes.len(),
            edges.len(),
            report_nodes.len()
        );

        ReportDefinition {
            schema_version: SCHEMA_VERSION.to_string(),
            id,
            name: non_empty(meta.name).unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string()),
            description: non_empty(meta.description)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            owner: meta.owner.unwrap_or_default(),
            category_id: meta.category_id,
            tags: meta.tags.unwrap_or_default(),
            primary_entity,
            created_at: meta.created_at.unwrap_or(now),
            updated_at: now,
            report_version,
            security: meta.security.unwrap_or_default(),
            parameters: meta.parameters.unwrap_or_default(),
            graph: ReportGraph {
                nodes: report_nodes,
                edges: report_edges,
            },
            layout,
            limits: meta.limits.unwrap_or_default(),
            hints: report_hints,
            artifacts: meta.artifacts,
        }
    }

    /// Recompiles an edited graph over an existing definition: id and
    /// `createdAt` are kept, the version is bumped, artifacts carry forward.
    pub fn recompile(
        &self,
        existing: &ReportDefinition,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
    ) -> ReportDefinition {
        self.compile(nodes, edges, Some(&DefinitionMetadata::from(existing)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
