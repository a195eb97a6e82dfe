//! Editor-side node configuration.
//!
//! Every field is optional: nodes are partially filled while the user edits
//! them, and the compiler substitutes defaults for anything left unset.

use super::node::NodeKind;
use crate::definition::{
    Align, ColumnFormat, ExportFormat, JoinType, Logic, Measure, Operator, PolicyKind, Relation,
    RelationDirection, SheetMode, SortKey, Timezone, WorkbookMode,
};
use crate::error::GraphConversionError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<SortKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<Timezone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_cap: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiCondition {
    pub attribute: String,
    pub operator: Operator,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupType {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiFilterGroup {
    #[serde(rename = "type")]
    pub group_type: GroupType,
    #[serde(default)]
    pub conditions: Vec<UiCondition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<UiCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_groups: Option<Vec<UiFilterGroup>>,
}

/// The relationship a link node follows, as picked in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiRelation {
    pub kind: RelationDirection,
    pub schema_name: String,
    pub from: String,
    pub to: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPolicy {
    pub kind: PolicyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<SortKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measures: Option<Vec<Measure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<UiRelation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_type: Option<JoinType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_filters: Option<Vec<UiFilterGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_sort: Option<Vec<SortKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_top_n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<JoinPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiExpression {
    pub alias: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expressions: Option<Vec<UiExpression>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measures: Option<Vec<Measure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having_filter: Option<UiFilterGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiSheetMode {
    Main,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiColumnFormat {
    Text,
    Number,
    Date,
    Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiColumn {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<UiColumnFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
}

impl UiColumn {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: None,
            format: None,
            width: None,
            align: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiFreeze {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_row: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_columns: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zebra_rows: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold_header: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<UiSheetMode>,
    /// Editor-only; the report definition has no slot for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<UiColumn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze: Option<UiFreeze>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<UiStyles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlinks: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// `pdf` is accepted here but has no canonical representation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<WorkbookMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotValue {
    pub func: String,
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<PivotValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<UiFilterGroup>>,
}

/// Per-kind node configuration. The variant determines the node's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig {
    Entity(EntityConfig),
    Filter(FilterConfig),
    Link(LinkConfig),
    Transform(TransformConfig),
    Aggregate(AggregateConfig),
    Sheet(SheetConfig),
    Export(ExportConfig),
    /// Palette-only; not compiled yet.
    Concatenate(Value),
    /// Palette-only; not compiled yet.
    Pivot(PivotConfig),
    /// A kind this crate does not know. Preserved verbatim, skipped by the compiler.
    Unrecognized { kind: String, config: Value },
}

macro_rules! impl_from_config {
    ($($config:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$config> for NodeConfig {
                fn from(config: $config) -> Self {
                    NodeConfig::$variant(config)
                }
            }
        )*
    };
}

impl_from_config! {
    EntityConfig => Entity,
    FilterConfig => Filter,
    LinkConfig => Link,
    TransformConfig => Transform,
    AggregateConfig => Aggregate,
    SheetConfig => Sheet,
    ExportConfig => Export,
    PivotConfig => Pivot,
}

impl NodeConfig {
    /// The known kind of this configuration, `None` for [`NodeConfig::Unrecognized`].
    pub fn kind(&self) -> Option<NodeKind> {
        match self {
            NodeConfig::Entity(_) => Some(NodeKind::Entity),
            NodeConfig::Filter(_) => Some(NodeKind::Filter),
            NodeConfig::Link(_) => Some(NodeKind::Link),
            NodeConfig::Transform(_) => Some(NodeKind::Transform),
            NodeConfig::Aggregate(_) => Some(NodeKind::Aggregate),
            NodeConfig::Sheet(_) => Some(NodeKind::Sheet),
            NodeConfig::Export(_) => Some(NodeKind::Export),
            NodeConfig::Concatenate(_) => Some(NodeKind::Concatenate),
            NodeConfig::Pivot(_) => Some(NodeKind::Pivot),
            NodeConfig::Unrecognized { .. } => None,
        }
    }

    /// The wire name of this configuration's kind.
    pub fn kind_name(&self) -> &str {
        match self {
            NodeConfig::Unrecognized { kind, .. } => kind,
            other => other.kind().map_or("", |k| k.as_str()),
        }
    }

    /// Decodes a configuration from its wire parts. A missing (`null`) config
    /// yields the kind's empty configuration.
    pub fn from_parts(
        node_id: &str,
        kind: &str,
        config: Value,
    ) -> Result<Self, GraphConversionError> {
        let Some(known) = NodeKind::parse(kind) else {
            return Ok(NodeConfig::Unrecognized {
                kind: kind.to_string(),
                config,
            });
        };

        Ok(match known {
            NodeKind::Entity => NodeConfig::Entity(decode(node_id, kind, config)?),
            NodeKind::Filter => NodeConfig::Filter(decode(node_id, kind, config)?),
            NodeKind::Link => NodeConfig::Link(decode(node_id, kind, config)?),
            NodeKind::Transform => NodeConfig::Transform(decode(node_id, kind, config)?),
            NodeKind::Aggregate => NodeConfig::Aggregate(decode(node_id, kind, config)?),
            NodeKind::Sheet => NodeConfig::Sheet(decode(node_id, kind, config)?),
            NodeKind::Export => NodeConfig::Export(decode(node_id, kind, config)?),
            NodeKind::Concatenate => NodeConfig::Concatenate(config),
            NodeKind::Pivot => NodeConfig::Pivot(decode(node_id, kind, config)?),
        })
    }

    /// Splits the configuration into its wire kind name and JSON body.
    pub fn into_parts(self) -> (String, Value) {
        let kind = self.kind_name().to_string();
        let body = match self {
            NodeConfig::Entity(c) => serde_json::to_value(c),
            NodeConfig::Filter(c) => serde_json::to_value(c),
            NodeConfig::Link(c) => serde_json::to_value(c),
            NodeConfig::Transform(c) => serde_json::to_value(c),
            NodeConfig::Aggregate(c) => serde_json::to_value(c),
            NodeConfig::Sheet(c) => serde_json::to_value(c),
            NodeConfig::Export(c) => serde_json::to_value(c),
            NodeConfig::Pivot(c) => serde_json::to_value(c),
            NodeConfig::Concatenate(config) | NodeConfig::Unrecognized { config, .. } => {
                Ok(config)
            }
        };
        (kind, body.unwrap_or_default())
    }
}

fn decode<T: DeserializeOwned + Default>(
    node_id: &str,
    kind: &str,
    config: Value,
) -> Result<T, GraphConversionError> {
    if config.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(config).map_err(|e| GraphConversionError::InvalidConfig {
        node_id: node_id.to_string(),
        kind: kind.to_string(),
        message: e.to_string(),
    })
}

impl From<GroupType> for Logic {
    fn from(group_type: GroupType) -> Self {
        match group_type {
            GroupType::And => Logic::And,
            GroupType::Or => Logic::Or,
        }
    }
}

impl From<Logic> for GroupType {
    fn from(logic: Logic) -> Self {
        match logic {
            Logic::And => GroupType::And,
            Logic::Or => GroupType::Or,
        }
    }
}

impl From<UiColumnFormat> for ColumnFormat {
    fn from(format: UiColumnFormat) -> Self {
        match format {
            UiColumnFormat::Text => ColumnFormat::Text,
            UiColumnFormat::Number => ColumnFormat::Number,
            UiColumnFormat::Date => ColumnFormat::Date,
            UiColumnFormat::Currency => ColumnFormat::Currency,
        }
    }
}

/// Fixed-precision number formats collapse to plain `number`.
impl From<ColumnFormat> for UiColumnFormat {
    fn from(format: ColumnFormat) -> Self {
        match format {
            ColumnFormat::Text => UiColumnFormat::Text,
            ColumnFormat::Number | ColumnFormat::Number1 | ColumnFormat::Number2 => {
                UiColumnFormat::Number
            }
            ColumnFormat::Date => UiColumnFormat::Date,
            ColumnFormat::Currency => UiColumnFormat::Currency,
        }
    }
}

impl From<UiSheetMode> for SheetMode {
    fn from(mode: UiSheetMode) -> Self {
        match mode {
            UiSheetMode::Main => SheetMode::Main,
            UiSheetMode::Child => SheetMode::Child,
        }
    }
}

/// The editor has no aggregate mode; aggregate sheets reopen as child sheets.
impl From<SheetMode> for UiSheetMode {
    fn from(mode: SheetMode) -> Self {
        match mode {
            SheetMode::Main => UiSheetMode::Main,
            SheetMode::Aggregate | SheetMode::Child => UiSheetMode::Child,
        }
    }
}

impl From<&UiRelation> for Relation {
    fn from(relation: &UiRelation) -> Self {
        Relation {
            direction: relation.kind,
            schema_name: relation.schema_name.clone(),
            from: relation.from.clone(),
            to: relation.to.clone(),
            target: relation.target.clone(),
        }
    }
}

impl From<&Relation> for UiRelation {
    fn from(relation: &Relation) -> Self {
        UiRelation {
            kind: relation.direction,
            schema_name: relation.schema_name.clone(),
            from: relation.from.clone(),
            to: relation.to.clone(),
            target: relation.target.clone(),
        }
    }
}
