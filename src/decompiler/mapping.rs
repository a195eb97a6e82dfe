use crate::definition::*;
use crate::error::DecompileError;
use crate::graph::*;

pub(super) fn map_node(node: &ReportGraphNode) -> Result<NodeConfig, DecompileError> {
    Ok(match &node.data {
        ReportNodeData::Entity(entity) => NodeConfig::Entity(EntityConfig {
            entity: Some(entity.entity.clone()),
            attributes: Some(entity.attributes.clone()),
            order_by: Some(entity.order_by.clone()),
            timezone: entity.timezone_behavior,
            row_cap: entity.top,
        }),
        ReportNodeData::Filter(filter) => NodeConfig::Filter(FilterConfig {
            conditions: Some(filter.conditions.iter().map(ui_condition).collect()),
            filter_groups: filter.groups.as_ref().map(|groups| {
                groups
                    .iter()
                    .map(|group| UiFilterGroup {
                        group_type: group.logic.into(),
                        conditions: group.conditions.iter().map(ui_condition).collect(),
                    })
                    .collect()
            }),
        }),
        ReportNodeData::Link(link) => NodeConfig::Link(map_link(&node.id, link)?),
        ReportNodeData::Transform(transform) => NodeConfig::Transform(TransformConfig {
            expressions: Some(
                transform
                    .expressions
                    .iter()
                    .map(|e| UiExpression {
                        alias: e.alias.clone(),
                        expression: e.expr.clone(),
                    })
                    .collect(),
            ),
        }),
        ReportNodeData::Sheet(sheet) => NodeConfig::Sheet(map_sheet(&node.id, sheet)),
        ReportNodeData::Export(export) => NodeConfig::Export(ExportConfig {
            format: Some(match export.format {
                ExportFormat::Pdf => ExportFormat::Xlsx,
                other => other,
            }),
            layout: Some(export.layout),
            file_name: Some(export.file_name.clone()),
        }),
    })
}

fn map_link(node_id: &str, link: &LinkNodeData) -> Result<LinkConfig, DecompileError> {
    let relation = link
        .relation
        .as_ref()
        .ok_or_else(|| DecompileError::MissingRelation {
            node_id: node_id.to_string(),
        })?;

    let policy = link.many_policy.as_ref().map(|policy| JoinPolicy {
        kind: policy.kind,
        field: policy.field.clone(),
        delimiter: policy.delimiter.clone(),
        order_by: policy.order_by.clone(),
        top: policy.top.as_ref().and_then(editable_top),
        measures: policy.measures.clone(),
        group_by: policy.group_by_child.clone(),
        sheet_name: policy.sheet_name.clone(),
        child_columns: policy.columns.clone(),
    });

    Ok(LinkConfig {
        relation: Some(UiRelation::from(relation)),
        alias: Some(link.alias.clone()),
        join_type: Some(link.join_type),
        child_filters: link.child_filters.as_ref().map(|conditions| {
            vec![UiFilterGroup {
                group_type: GroupType::And,
                conditions: conditions.iter().map(ui_condition).collect(),
            }]
        }),
        child_sort: link.child_order_by.clone(),
        child_top_n: link.child_top,
        child_fields: Some(link.child_fields.clone()),
        policy,
    })
}

/// The editor's `top` field is numeric only: parameter references keep their
/// digits and nothing else. A reference without digits clears the field.
pub fn editable_top(top: &TopValue) -> Option<u32> {
    match top {
        TopValue::Literal(n) => Some(*n),
        TopValue::Param(reference) => {
            let digits: String = reference.chars().filter(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
    }
}

fn map_sheet(node_id: &str, sheet: &SheetNodeData) -> SheetConfig {
    if sheet.mode == SheetMode::Aggregate {
        log::warn!(
            "Sheet node '{}' ('{}') is an aggregate sheet; it reopens as a child sheet",
            node_id,
            sheet.name
        );
    }

    let columns = sheet
        .columns
        .iter()
        .map(|column| UiColumn {
            key: column.key.clone(),
            title: Some(column.title.clone()),
            format: Some(column.format.map_or(UiColumnFormat::Text, UiColumnFormat::from)),
            width: column.width,
            align: column.align,
        })
        .collect();

    SheetConfig {
        name: Some(sheet.name.clone()),
        mode: Some(sheet.mode.into()),
        parent_key: None,
        columns: Some(columns),
        freeze: sheet.freeze.map(|freeze| UiFreeze {
            first_row: Some(freeze.rows.unwrap_or(0) > 0),
            first_columns: freeze.columns,
        }),
        styles: sheet.styles.map(|styles| UiStyles {
            zebra_rows: styles.zebra,
            bold_header: styles.header_bold,
        }),
        hyperlinks: sheet.hyperlinks.and_then(|h| h.child_sheet_links),
    }
}

fn ui_condition(condition: &FilterCondition) -> UiCondition {
    UiCondition {
        attribute: condition.attribute.clone(),
        operator: condition.operator,
        value: condition.value.clone(),
    }
}
