use super::layout::WorkbookMode;
use crate::graph::Position;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An `{attribute, desc}` ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub attribute: String,
    #[serde(default)]
    pub desc: bool,
}

impl SortKey {
    pub fn asc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            desc: false,
        }
    }

    pub fn desc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            desc: true,
        }
    }
}

/// How date-time values of the root entity are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timezone {
    User,
    Utc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "ne")]
    Ne,
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "ge")]
    Ge,
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "le")]
    Le,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "notin")]
    NotIn,
    #[serde(rename = "on-or-after")]
    OnOrAfter,
    #[serde(rename = "on-or-before")]
    OnOrBefore,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Like => "like",
            Operator::In => "in",
            Operator::NotIn => "notin",
            Operator::OnOrAfter => "on-or-after",
            Operator::OnOrBefore => "on-or-before",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    And,
    Or,
}

/// A single `attribute operator value` predicate. `value` may hold a literal
/// or a `@Parameter` reference; it is never resolved here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub attribute: String,
    pub operator: Operator,
    pub value: Value,
    /// Display text only; regenerated on every compile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub logic: Logic,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityNodeData {
    pub entity: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<SortKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_behavior: Option<Timezone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterNodeData {
    pub logic: Logic,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<FilterGroup>>,
}

impl FilterNodeData {
    /// Top-level conditions plus every grouped condition.
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
            + self
                .groups
                .iter()
                .flatten()
                .map(|g| g.conditions.len())
                .sum::<usize>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationDirection {
    ManyToOne,
    OneToMany,
    ManyToMany,
}

impl RelationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationDirection::ManyToOne => "manyToOne",
            RelationDirection::OneToMany => "oneToMany",
            RelationDirection::ManyToMany => "manyToMany",
        }
    }
}

impl fmt::Display for RelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub direction: RelationDirection,
    pub schema_name: String,
    pub from: String,
    pub to: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    Outer,
}

/// Strategy for folding a to-many join into the parent row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicyKind {
    Expand,
    Summarize,
    Concat,
    ChildSheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub func: MeasureFunc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub alias: String,
}

/// A row cap that is either a literal or a `@Parameter` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopValue {
    Literal(u32),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManyPolicy {
    pub kind: PolicyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<SortKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<TopValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measures: Option<Vec<Measure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by_child: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkNodeData {
    /// Always produced by the compiler when the editor chose one. Documents
    /// without it are malformed and rejected by the decompiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
    pub join_type: JoinType,
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_filters: Option<Vec<FilterCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_order_by: Option<Vec<SortKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_top: Option<u32>,
    #[serde(default)]
    pub child_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub many_policy: Option<ManyPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformExpression {
    pub alias: String,
    pub expr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformNodeData {
    #[serde(default)]
    pub expressions: Vec<TransformExpression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetMode {
    Main,
    Aggregate,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnFormat {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "currency")]
    Currency,
    #[serde(rename = "number(1)")]
    Number1,
    #[serde(rename = "number(2)")]
    Number2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetColumn {
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ColumnFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SheetFreeze {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zebra: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_filter: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetHyperlinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_sheet_links: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetNodeData {
    pub name: String,
    pub mode: SheetMode,
    #[serde(default)]
    pub columns: Vec<SheetColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze: Option<SheetFreeze>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<SheetStyles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlinks: Option<SheetHyperlinks>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNodeData {
    pub format: ExportFormat,
    pub layout: WorkbookMode,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_metadata_sheet: Option<bool>,
}

/// The strictly typed payload of a report graph node, one variant per compiled kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ReportNodeData {
    Entity(EntityNodeData),
    Filter(FilterNodeData),
    Link(LinkNodeData),
    Transform(TransformNodeData),
    Sheet(SheetNodeData),
    Export(ExportNodeData),
}

impl ReportNodeData {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ReportNodeData::Entity(_) => "entity",
            ReportNodeData::Filter(_) => "filter",
            ReportNodeData::Link(_) => "link",
            ReportNodeData::Transform(_) => "transform",
            ReportNodeData::Sheet(_) => "sheet",
            ReportNodeData::Export(_) => "export",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportGraphNode {
    pub id: String,
    #[serde(flatten)]
    pub data: ReportNodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportGraphEdge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportGraph {
    #[serde(default)]
    pub nodes: Vec<ReportGraphNode>,
    #[serde(default)]
    pub edges: Vec<ReportGraphEdge>,
}
