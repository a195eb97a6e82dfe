use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkbookMode {
    #[default]
    SingleSheet,
    MultiSheet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSheet {
    pub enabled: bool,
    pub name: String,
}

impl Default for MetadataSheet {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "_Meta".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookLayout {
    pub mode: WorkbookMode,
    #[serde(default)]
    pub sheets_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_sheet: Option<MetadataSheet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub workbook: WorkbookLayout,
}

/// Execution guardrails consumed by the execution engine. Never inferred from the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub page_size: u32,
    pub preview_rows: u32,
    pub max_expanded_rows: u32,
    pub max_columns_per_sheet: u32,
    pub max_link_depth: u32,
    pub default_child_top: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            page_size: 5000,
            preview_rows: 100,
            max_expanded_rows: 200_000,
            max_columns_per_sheet: 100,
            max_link_depth: 3,
            default_child_top: 10,
        }
    }
}
