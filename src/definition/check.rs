//! Document-level integrity checks.
//!
//! These complement the structural validator: they look at a stored
//! definition as a document (identity fields, schema version, referential
//! integrity of edges, required per-kind data) rather than at graph shape.

use super::document::ReportDefinition;
use super::node_data::ReportNodeData;
use ahash::AHashSet;
use semver::Version;

/// Outcome of [`check_definition`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntegrityReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Checks that a definition is a well-formed document.
pub fn check_definition(report: &ReportDefinition) -> IntegrityReport {
    let mut errors = Vec::new();

    if report.id.trim().is_empty() {
        errors.push("Report ID is required".to_string());
    }
    if report.name.trim().is_empty() {
        errors.push("Report name is required".to_string());
    }
    if report.schema_version.trim().is_empty() {
        errors.push("Schema version is required".to_string());
    } else if let Err(e) = Version::parse(&report.schema_version) {
        errors.push(format!(
            "Schema version '{}' is not a valid semantic version: {}",
            report.schema_version, e
        ));
    }
    if report.primary_entity.trim().is_empty() {
        errors.push("Primary entity is required".to_string());
    }

    if report.graph.nodes.is_empty() {
        errors.push("Report must have at least one node".to_string());
    }
    if !report
        .graph
        .nodes
        .iter()
        .any(|n| matches!(n.data, ReportNodeData::Entity(_)))
    {
        errors.push("Report must have at least one entity node".to_string());
    }

    let mut node_ids = AHashSet::new();
    for node in &report.graph.nodes {
        if !node_ids.insert(node.id.as_str()) {
            errors.push(format!("Duplicate node id: {}", node.id));
        }
        if let ReportNodeData::Link(link) = &node.data
            && link.relation.is_none()
        {
            errors.push(format!("Link node {} has no relation", node.id));
        }
    }

    for edge in &report.graph.edges {
        if !node_ids.contains(edge.from.as_str()) {
            errors.push(format!("Edge references unknown source node: {}", edge.from));
        }
        if !node_ids.contains(edge.to.as_str()) {
            errors.push(format!("Edge references unknown target node: {}", edge.to));
        }
    }

    IntegrityReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
