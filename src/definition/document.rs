use super::artifact::{Artifacts, Hints};
use super::layout::{Layout, Limits};
use super::node_data::{ReportGraph, ReportGraphNode, ReportNodeData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version of the document shape written by this crate.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// `primaryEntity` of a definition compiled from a graph with no entity node.
pub const UNKNOWN_ENTITY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub name: String,
}

impl Default for Owner {
    fn default() -> Self {
        Self {
            id: "current-user".to_string(),
            name: "Current User".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecuteAs {
    #[default]
    Caller,
    Owner,
    SystemUser,
}

/// Policy consumed by the execution engine; carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub execute_as: ExecuteAs,
    #[serde(default)]
    pub allowed_roles: Vec<String>,
    #[serde(default)]
    pub blocked_entities_regex: Option<String>,
}

impl Default for Security {
    fn default() -> Self {
        Self {
            execute_as: ExecuteAs::Caller,
            allowed_roles: vec!["Report Generator".to_string()],
            blocked_entities_regex: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Boolean,
    String,
    Number,
    Date,
    DateTime,
    OptionSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterOption {
    pub value: Value,
    pub label: String,
}

/// A named placeholder referenced from node configuration as `@Name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ParameterOption>>,
}

impl Parameter {
    /// The reference form used inside node configuration.
    pub fn reference(&self) -> String {
        format!("@{}", self.name)
    }
}

/// The canonical, versioned report document. Its JSON form is the storage and
/// exchange format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    pub schema_version: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub primary_entity: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub report_version: u32,

    #[serde(default)]
    pub security: Security,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub graph: ReportGraph,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub hints: Hints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Artifacts>,
}

impl ReportDefinition {
    pub fn node(&self, id: &str) -> Option<&ReportGraphNode> {
        self.graph.nodes.iter().find(|n| n.id == id)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        let name = name.strip_prefix('@').unwrap_or(name);
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Sheet names in graph order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.graph
            .nodes
            .iter()
            .filter_map(|n| match &n.data {
                ReportNodeData::Sheet(sheet) => Some(sheet.name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Identity and metadata carried into a compile: the partial form of a
/// [`ReportDefinition`]. Every field is optional; unset fields take defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefinitionMetadata {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<Owner>,
    pub category_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub report_version: Option<u32>,
    pub security: Option<Security>,
    pub parameters: Option<Vec<Parameter>>,
    pub limits: Option<Limits>,
    pub artifacts: Option<Artifacts>,
    /// The previously compiled graph, used to detect sheet-mode downgrades.
    pub graph: Option<ReportGraph>,
}

impl DefinitionMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl From<&ReportDefinition> for DefinitionMetadata {
    fn from(def: &ReportDefinition) -> Self {
        Self {
            id: Some(def.id.clone()),
            name: Some(def.name.clone()),
            description: Some(def.description.clone()),
            owner: Some(def.owner.clone()),
            category_id: def.category_id.clone(),
            tags: Some(def.tags.clone()),
            created_at: Some(def.created_at),
            report_version: Some(def.report_version),
            security: Some(def.security.clone()),
            parameters: Some(def.parameters.clone()),
            limits: Some(def.limits),
            artifacts: def.artifacts.clone(),
            graph: Some(def.graph.clone()),
        }
    }
}
