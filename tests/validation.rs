//! Tests for the structural validator.
mod common;
use common::*;
use pretty_assertions::assert_eq;
use reportgraph::definition::WorkbookMode;
use reportgraph::graph::*;
use reportgraph::validation::{has_cycle, validate, validate_definition};
use serde_json::json;

const NO_ENTITY: &str = "At least one entity node is required";
const NO_SHEET: &str = "No sheet nodes found - add sheets to define output format";
const NO_EXPORT: &str = "No export node found - add an export node to define output format";
const CYCLE: &str = "Flow contains cycles - this is not allowed";

#[test]
fn test_validate_basic_graph_is_clean() {
    let graph = basic_graph();
    let report = validate(&graph.nodes, &graph.edges);

    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_validate_empty_graph() {
    let report = validate::<GraphNode, GraphEdge>(&[], &[]);

    assert!(!report.is_valid);
    assert_eq!(report.errors, vec![NO_ENTITY]);
    assert_eq!(report.warnings, vec![NO_SHEET, NO_EXPORT]);
}

#[test]
fn test_validate_single_node_is_never_disconnected() {
    let nodes = vec![entity_node("e", "account", &[])];
    let report = validate::<_, GraphEdge>(&nodes, &[]);

    assert!(report.is_valid);
    assert_eq!(report.warnings, vec![NO_SHEET, NO_EXPORT]);
}

#[test]
fn test_validate_reports_disconnected_nodes() {
    let nodes = vec![
        entity_node("e", "account", &[]),
        sheet_node("s", "Accounts", &[]),
        export_node("x"),
    ];
    let edges = vec![GraphEdge::new("e", "s")];
    let report = validate(&nodes, &edges);

    assert!(report.is_valid, "disconnection is advisory");
    assert_eq!(report.warnings, vec!["Node x is not connected to the flow"]);
}

#[test]
fn test_validate_detects_cycle_once() {
    let mut graph = basic_graph();
    graph.connect("x", "e");
    graph.connect("s", "f");
    let report = validate(&graph.nodes, &graph.edges);

    assert!(!report.is_valid);
    assert_eq!(report.errors, vec![CYCLE]);
}

#[test]
fn test_validate_self_loop_is_a_cycle() {
    let nodes = vec![entity_node("e", "account", &[]), sheet_node("s", "A", &[])];
    let edges = vec![GraphEdge::new("e", "s"), GraphEdge::new("s", "s")];
    let report = validate(&nodes, &edges);

    assert_eq!(report.errors, vec![CYCLE]);
}

#[test]
fn test_validate_three_node_cycle_clears_when_back_edge_removed() {
    let nodes = vec![
        entity_node("n1", "account", &[]),
        filter_node("n2", vec![]),
        sheet_node("n3", "Accounts", &[]),
    ];
    let mut edges = vec![
        GraphEdge::new("n1", "n2"),
        GraphEdge::new("n2", "n3"),
        GraphEdge::new("n3", "n1"),
    ];

    let report = validate(&nodes, &edges);
    assert!(!report.is_valid);
    assert_eq!(report.errors, vec![CYCLE]);

    edges.retain(|e| !(e.source == "n3" && e.target == "n1"));
    let report = validate(&nodes, &edges);
    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    assert_eq!(report.warnings, vec![NO_EXPORT]);
}

#[test]
fn test_validate_single_node_self_loop() {
    let nodes = vec![entity_node("n1", "account", &[])];
    let edges = vec![GraphEdge::new("n1", "n1")];
    let report = validate(&nodes, &edges);

    assert!(!report.is_valid);
    assert_eq!(report.errors, vec![CYCLE]);
    assert_eq!(report.warnings, vec![NO_SHEET, NO_EXPORT]);
}

fn minimal_employee_report() -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let nodes: Vec<GraphNode> = serde_json::from_value(json!([
        {
            "id": "e1",
            "kind": "entity",
            "config": {"entity": "employee", "attributes": ["fullname"]}
        },
        {
            "id": "s1",
            "kind": "sheet",
            "config": {"name": "Employees", "columns": [{"key": "fullname"}]}
        },
        {
            "id": "x1",
            "kind": "export",
            "config": {"format": "xlsx", "layout": "singleSheet", "fileName": "out.xlsx"}
        }
    ]))
    .unwrap();
    let edges = vec![GraphEdge::new("e1", "s1"), GraphEdge::new("s1", "x1")];
    (nodes, edges)
}

#[test]
fn test_minimal_employee_report_validates_and_compiles() {
    let (nodes, edges) = minimal_employee_report();

    let report = validate(&nodes, &edges);
    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());

    let definition = fixed_compiler().compile(&nodes, &edges, None);
    assert_eq!(definition.primary_entity, "employee");
    assert_eq!(definition.layout.workbook.mode, WorkbookMode::SingleSheet);
    assert_eq!(definition.hints.row_estimate.unwrap().base, 2500);
}

#[test]
fn test_orphan_filter_is_a_warning_not_an_error() {
    let (mut nodes, edges) = minimal_employee_report();
    nodes.push(
        serde_json::from_value(json!({
            "id": "orphan",
            "kind": "filter",
            "config": {"conditions": []}
        }))
        .unwrap(),
    );

    let report = validate(&nodes, &edges);
    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    assert_eq!(report.warnings, vec!["Node orphan is not connected to the flow"]);
}

#[test]
fn test_validate_collects_all_errors() {
    let nodes = vec![sheet_node("a", "A", &[]), sheet_node("b", "B", &[])];
    let edges = vec![GraphEdge::new("a", "b"), GraphEdge::new("b", "a")];
    let report = validate(&nodes, &edges);

    assert_eq!(report.errors, vec![NO_ENTITY, CYCLE]);
    assert_eq!(report.warnings, vec![NO_EXPORT]);
}

#[test]
fn test_validate_diamond_is_acyclic() {
    let nodes = vec![
        entity_node("e", "account", &[]),
        link_node("l1", None, None),
        link_node("l2", None, None),
        sheet_node("s", "A", &[]),
        export_node("x"),
    ];
    let edges = vec![
        GraphEdge::new("e", "l1"),
        GraphEdge::new("e", "l2"),
        GraphEdge::new("l1", "s"),
        GraphEdge::new("l2", "s"),
        GraphEdge::new("s", "x"),
    ];
    let report = validate(&nodes, &edges);
    assert!(report.is_valid);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_cycle_detection_handles_long_chains() {
    let nodes: Vec<GraphNode> = (0..50_000)
        .map(|i| entity_node(&format!("n{i}"), "account", &[]))
        .collect();
    let mut edges: Vec<GraphEdge> = (1..nodes.len())
        .map(|i| GraphEdge::new(format!("n{}", i - 1), format!("n{i}")))
        .collect();

    assert!(!has_cycle(&nodes, &edges));

    edges.push(GraphEdge::new("n49999", "n0"));
    assert!(has_cycle(&nodes, &edges));
}

#[test]
fn test_cycle_through_unknown_nodes_is_detected() {
    let nodes = vec![entity_node("e", "account", &[])];
    let edges = vec![GraphEdge::new("ghost-a", "ghost-b"), GraphEdge::new("ghost-b", "ghost-a")];
    assert!(has_cycle(&nodes, &edges));
}

#[test]
fn test_validate_counts_unrecognized_kinds_as_nodes() {
    let nodes = vec![
        entity_node("e", "account", &[]),
        GraphNode::new(
            "c",
            NodeConfig::Unrecognized {
                kind: "chart".to_string(),
                config: serde_json::Value::Null,
            },
        ),
    ];
    let report = validate::<_, GraphEdge>(&nodes, &[]);
    assert!(report.warnings.contains(&"Node c is not connected to the flow".to_string()));
}

#[test]
fn test_validate_sample_definition() {
    let report = validate_definition(&reportgraph::create_sample());
    assert!(report.is_valid);
    assert!(report.errors.is_empty());
}

#[test]
fn test_validation_report_serializes_camel_case() {
    let report = validate::<GraphNode, GraphEdge>(&[], &[]);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["isValid"], serde_json::json!(false));
    assert_eq!(value["errors"][0], serde_json::json!(NO_ENTITY));
}
