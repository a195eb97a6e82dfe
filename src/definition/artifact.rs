use super::node_data::{FilterCondition, SortKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Advisory row-count estimate. Recomputed on every compile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowEstimate {
    pub base: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_estimate: Option<u64>,
}

/// Non-authoritative hints. Must never gate execution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_estimate: Option<RowEstimate>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_execution_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSnapshotRef {
    pub id: String,
    pub version: String,
    pub lcid: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildPlan {
    pub target_entity: String,
    pub parent_key: String,
    pub select: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<SortKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterCondition>>,
}

/// Plan fragments produced by the external compilation backend.
///
/// This crate never populates these; it only carries them forward when a
/// prior definition supplies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifacts {
    pub compiler_version: String,
    pub compiled_at: String,
    pub metadata_snapshot: MetadataSnapshotRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_fetch_xml: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_fetches: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_plans: Option<BTreeMap<String, ChildPlan>>,
}
