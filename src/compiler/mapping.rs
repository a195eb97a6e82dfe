use crate::definition::*;
use crate::graph::{
    EntityConfig, ExportConfig, FilterConfig, GraphNode, LinkConfig, NodeConfig, SheetConfig,
    TransformConfig, UiCondition,
};
use itertools::Itertools;
use serde_json::Value;

/// Placeholder file name; the execution engine substitutes the date.
pub const DEFAULT_FILE_NAME: &str = "Report_{yyyyMMdd}.xlsx";

const DEFAULT_LINK_ALIAS: &str = "linked";
const DEFAULT_SHEET_NAME: &str = "Unnamed Sheet";

/// Maps one editor node into its canonical form. Returns `None` for kinds that
/// are not compiled. Per-node advisory warnings are pushed to `warnings`.
pub(super) fn map_node(node: &GraphNode, warnings: &mut Vec<String>) -> Option<ReportGraphNode> {
    let data = match &node.config {
        NodeConfig::Entity(config) => ReportNodeData::Entity(map_entity(config)),
        NodeConfig::Filter(config) => ReportNodeData::Filter(map_filter(config)),
        NodeConfig::Link(config) => ReportNodeData::Link(map_link(&node.id, config, warnings)),
        NodeConfig::Transform(config) => ReportNodeData::Transform(map_transform(config)),
        NodeConfig::Sheet(config) => ReportNodeData::Sheet(map_sheet(config)),
        NodeConfig::Export(config) => {
            ReportNodeData::Export(map_export(&node.id, config, warnings))
        }
        NodeConfig::Aggregate(_)
        | NodeConfig::Concatenate(_)
        | NodeConfig::Pivot(_)
        | NodeConfig::Unrecognized { .. } => {
            log::debug!(
                "Skipping node '{}': kind '{}' is not compiled",
                node.id,
                node.kind_name()
            );
            return None;
        }
    };

    Some(ReportGraphNode {
        id: node.id.clone(),
        data,
        position: node.position,
    })
}

fn map_entity(config: &EntityConfig) -> EntityNodeData {
    EntityNodeData {
        entity: config
            .entity
            .clone()
            .unwrap_or_else(|| UNKNOWN_ENTITY.to_string()),
        attributes: config.attributes.clone().unwrap_or_default(),
        order_by: config.order_by.clone().unwrap_or_default(),
        timezone_behavior: Some(config.timezone.unwrap_or(Timezone::User)),
        top: config.row_cap,
    }
}

fn map_filter(config: &FilterConfig) -> FilterNodeData {
    let groups = config
        .filter_groups
        .iter()
        .flatten()
        .map(|group| FilterGroup {
            logic: group.group_type.into(),
            conditions: group.conditions.iter().map(labelled_condition).collect(),
        })
        .collect();

    FilterNodeData {
        logic: Logic::And,
        conditions: config
            .conditions
            .iter()
            .flatten()
            .map(labelled_condition)
            .collect(),
        groups: Some(groups),
    }
}

fn map_link(node_id: &str, config: &LinkConfig, warnings: &mut Vec<String>) -> LinkNodeData {
    let relation = config.relation.as_ref().map(Relation::from);
    if relation.is_none() {
        warnings.push(format!(
            "Link node {node_id} has no relation and cannot be reopened until a relation is chosen"
        ));
    }

    let mut groups = config.child_filters.iter().flatten();
    // Only the first group survives; the canonical child filter list is flat.
    let child_filters = groups
        .next()
        .map(|group| {
            group
                .conditions
                .iter()
                .map(|c| FilterCondition {
                    attribute: c.attribute.clone(),
                    operator: c.operator,
                    value: c.value.clone(),
                    label: None,
                })
                .collect()
        })
        .unwrap_or_default();
    let dropped = groups.count();
    if dropped > 0 {
        log::debug!("Link node '{node_id}': dropping {dropped} child filter group(s) after the first");
    }

    let many_policy = config.policy.as_ref().map(|policy| ManyPolicy {
        kind: policy.kind,
        field: policy.field.clone(),
        delimiter: policy.delimiter.clone(),
        order_by: policy.order_by.clone(),
        top: policy.top.map(TopValue::Literal),
        output_alias: config.alias.clone(),
        measures: policy.measures.clone(),
        group_by_child: policy.group_by.clone(),
        sheet_name: policy.sheet_name.clone(),
        columns: policy.child_columns.clone(),
    });

    LinkNodeData {
        relation,
        join_type: config.join_type.unwrap_or(JoinType::Outer),
        alias: config
            .alias
            .clone()
            .unwrap_or_else(|| DEFAULT_LINK_ALIAS.to_string()),
        child_filters: Some(child_filters),
        child_order_by: Some(config.child_sort.clone().unwrap_or_default()),
        child_top: config.child_top_n,
        child_fields: config.child_fields.clone().unwrap_or_default(),
        many_policy,
    }
}

fn map_transform(config: &TransformConfig) -> TransformNodeData {
    TransformNodeData {
        expressions: config
            .expressions
            .iter()
            .flatten()
            .map(|e| TransformExpression {
                alias: e.alias.clone(),
                expr: e.expression.clone(),
            })
            .collect(),
    }
}

fn map_sheet(config: &SheetConfig) -> SheetNodeData {
    let columns = config
        .columns
        .iter()
        .flatten()
        .map(|column| SheetColumn {
            key: column.key.clone(),
            title: column.title.clone().unwrap_or_else(|| column.key.clone()),
            width: column.width,
            format: Some(column.format.map_or(ColumnFormat::Text, ColumnFormat::from)),
            align: column.align,
            wrap: Some(false),
        })
        .collect();

    SheetNodeData {
        name: config
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
        mode: config.mode.map_or(SheetMode::Main, SheetMode::from),
        columns,
        freeze: config.freeze.map(|freeze| SheetFreeze {
            rows: Some(u32::from(freeze.first_row.unwrap_or(false))),
            columns: Some(freeze.first_columns.unwrap_or(0)),
        }),
        styles: config.styles.map(|styles| SheetStyles {
            zebra: styles.zebra_rows,
            header_bold: styles.bold_header,
            auto_filter: Some(true),
        }),
        hyperlinks: config.hyperlinks.map(|links| SheetHyperlinks {
            child_sheet_links: Some(links),
        }),
    }
}

fn map_export(node_id: &str, config: &ExportConfig, warnings: &mut Vec<String>) -> ExportNodeData {
    let format = match config.format {
        Some(ExportFormat::Pdf) => {
            warnings.push(format!(
                "Export node {node_id} requests pdf output, which is not supported; compiled as xlsx"
            ));
            ExportFormat::Xlsx
        }
        Some(format) => format,
        None => ExportFormat::Xlsx,
    };

    ExportNodeData {
        format,
        layout: config.layout.unwrap_or_default(),
        file_name: config
            .file_name
            .clone()
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        include_metadata_sheet: Some(true),
    }
}

fn labelled_condition(condition: &UiCondition) -> FilterCondition {
    FilterCondition {
        attribute: condition.attribute.clone(),
        operator: condition.operator,
        value: condition.value.clone(),
        label: Some(condition_label(
            &condition.attribute,
            condition.operator,
            &condition.value,
        )),
    }
}

/// Display caption `"<attribute> <operator> <value>"` of a filter condition.
pub fn condition_label(attribute: &str, operator: Operator, value: &Value) -> String {
    format!("{attribute} {operator} {}", display_value(value))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).join(","),
        other => other.to_string(),
    }
}

