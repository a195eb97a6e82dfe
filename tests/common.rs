//! Common test utilities for building editor graphs and deterministic compilers.
use chrono::{DateTime, TimeZone, Utc};
use reportgraph::clock::{FixedClock, SequentialIds};
use reportgraph::definition::*;
use reportgraph::graph::*;
use serde_json::json;

/// 2025-01-15 08:00:00 UTC.
#[allow(dead_code)]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap()
}

/// A compiler frozen at [`t0`] that mints `report-1`, `report-2`, ...
#[allow(dead_code)]
pub fn fixed_compiler() -> reportgraph::compiler::Compiler {
    reportgraph::compiler::Compiler::builder()
        .with_clock(FixedClock(t0()))
        .with_id_source(SequentialIds::new())
        .build()
}

#[allow(dead_code)]
pub fn entity_node(id: &str, entity: &str, attributes: &[&str]) -> GraphNode {
    GraphNode::new(
        id,
        EntityConfig {
            entity: Some(entity.to_string()),
            attributes: Some(strings(attributes)),
            ..EntityConfig::default()
        },
    )
}

#[allow(dead_code)]
pub fn filter_node(id: &str, conditions: Vec<UiCondition>) -> GraphNode {
    GraphNode::new(
        id,
        FilterConfig {
            conditions: Some(conditions),
            filter_groups: None,
        },
    )
}

#[allow(dead_code)]
pub fn condition(attribute: &str, operator: Operator, value: serde_json::Value) -> UiCondition {
    UiCondition {
        attribute: attribute.to_string(),
        operator,
        value,
    }
}

/// One-to-many relation from `account` to `target`.
#[allow(dead_code)]
pub fn relation(schema_name: &str, target: &str) -> UiRelation {
    UiRelation {
        kind: RelationDirection::OneToMany,
        schema_name: schema_name.to_string(),
        from: "accountid".to_string(),
        to: "parentcustomerid".to_string(),
        target: target.to_string(),
    }
}

#[allow(dead_code)]
pub fn link_node(id: &str, relation: Option<UiRelation>, alias: Option<&str>) -> GraphNode {
    GraphNode::new(
        id,
        LinkConfig {
            relation,
            alias: alias.map(str::to_string),
            ..LinkConfig::default()
        },
    )
}

#[allow(dead_code)]
pub fn sheet_node(id: &str, name: &str, columns: &[&str]) -> GraphNode {
    GraphNode::new(
        id,
        SheetConfig {
            name: Some(name.to_string()),
            columns: Some(columns.iter().map(|key| UiColumn::new(*key)).collect()),
            ..SheetConfig::default()
        },
    )
}

#[allow(dead_code)]
pub fn export_node(id: &str) -> GraphNode {
    GraphNode::new(id, ExportConfig::default())
}

/// `entity -> filter -> sheet -> export` over accounts.
#[allow(dead_code)]
pub fn basic_graph() -> Graph {
    let mut graph = Graph::default();
    graph
        .add_node(entity_node("e", "account", &["name", "revenue"]))
        .add_node(filter_node(
            "f",
            vec![condition("statecode", Operator::Eq, json!(0))],
        ))
        .add_node(sheet_node("s", "Accounts", &["name", "revenue"]))
        .add_node(export_node("x"))
        .connect("e", "f")
        .connect("f", "s")
        .connect("s", "x");
    graph
}

/// A graph whose every config is already in the shape the decompiler
/// produces, with every node placed.
#[allow(dead_code)]
pub fn full_graph() -> Graph {
    let entity = GraphNode::new(
        "e",
        EntityConfig {
            entity: Some("account".to_string()),
            attributes: Some(strings(&["name", "revenue"])),
            order_by: Some(vec![SortKey::asc("name")]),
            timezone: Some(Timezone::Utc),
            row_cap: Some(500),
        },
    )
    .at(50.0, 50.0);

    let filter = GraphNode::new(
        "f",
        FilterConfig {
            conditions: Some(vec![condition("statecode", Operator::Eq, json!(0))]),
            filter_groups: Some(vec![UiFilterGroup {
                group_type: GroupType::Or,
                conditions: vec![
                    condition("industrycode", Operator::Eq, json!(1)),
                    condition("industrycode", Operator::Eq, json!(2)),
                ],
            }]),
        },
    )
    .at(350.0, 50.0);

    let link = GraphNode::new(
        "l",
        LinkConfig {
            relation: Some(relation("contact_customer_accounts", "contact")),
            alias: Some("contacts".to_string()),
            join_type: Some(JoinType::Inner),
            child_filters: Some(vec![UiFilterGroup {
                group_type: GroupType::And,
                conditions: vec![condition("statecode", Operator::Eq, json!(0))],
            }]),
            child_sort: Some(vec![SortKey::desc("createdon")]),
            child_top_n: Some(5),
            child_fields: Some(strings(&["fullname", "emailaddress1"])),
            policy: Some(JoinPolicy {
                kind: PolicyKind::Concat,
                field: Some("fullname".to_string()),
                delimiter: Some(", ".to_string()),
                order_by: None,
                top: Some(3),
                measures: None,
                group_by: None,
                sheet_name: None,
                child_columns: None,
            }),
        },
    )
    .at(650.0, 50.0);

    let transform = GraphNode::new(
        "t",
        TransformConfig {
            expressions: Some(vec![UiExpression {
                alias: "Domain".to_string(),
                expression: "rightOf(websiteurl,'.')".to_string(),
            }]),
        },
    )
    .at(950.0, 50.0);

    let sheet = GraphNode::new(
        "s",
        SheetConfig {
            name: Some("Accounts".to_string()),
            mode: Some(UiSheetMode::Main),
            parent_key: None,
            columns: Some(vec![
                UiColumn {
                    key: "name".to_string(),
                    title: Some("Account".to_string()),
                    format: Some(UiColumnFormat::Text),
                    width: Some(30),
                    align: None,
                },
                UiColumn {
                    key: "revenue".to_string(),
                    title: Some("Revenue".to_string()),
                    format: Some(UiColumnFormat::Currency),
                    width: None,
                    align: Some(Align::Right),
                },
            ]),
            freeze: Some(UiFreeze {
                first_row: Some(true),
                first_columns: Some(1),
            }),
            styles: Some(UiStyles {
                zebra_rows: Some(true),
                bold_header: Some(true),
            }),
            hyperlinks: Some(false),
        },
    )
    .at(1250.0, 50.0);

    let export = GraphNode::new(
        "x",
        ExportConfig {
            format: Some(ExportFormat::Csv),
            layout: Some(WorkbookMode::SingleSheet),
            file_name: Some("Accounts.csv".to_string()),
        },
    )
    .at(1550.0, 50.0);

    let mut graph = Graph::new(vec![entity, filter, link, transform, sheet, export], vec![]);
    graph
        .connect("e", "f")
        .connect("f", "l")
        .connect("l", "t")
        .connect("t", "s")
        .connect("s", "x");
    graph
}

#[allow(dead_code)]
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
