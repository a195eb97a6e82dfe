//! Tests for definition → graph decompilation and compile/decompile round trips.
mod common;
use common::*;
use pretty_assertions::assert_eq;
use reportgraph::decompile;
use reportgraph::definition::*;
use reportgraph::error::DecompileError;
use reportgraph::graph::*;
use serde_json::json;

fn configs(graph: &Graph) -> Vec<(&str, &NodeConfig, Option<Position>)> {
    graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), &n.config, n.position))
        .collect()
}

#[test]
fn test_round_trip_preserves_editable_configuration() {
    let graph = full_graph();
    let report = fixed_compiler().compile(&graph.nodes, &graph.edges, None);
    let reopened = decompile(&report).unwrap();

    assert_eq!(configs(&reopened), configs(&graph));
    assert_eq!(reopened.edges, graph.edges);
}

#[test]
fn test_recompile_of_decompiled_graph_is_stable() {
    let graph = full_graph();
    let compiler = fixed_compiler();
    let first = compiler.compile(&graph.nodes, &graph.edges, None);

    let reopened = decompile(&first).unwrap();
    let second = compiler.recompile(&first, &reopened.nodes, &reopened.edges);

    assert_eq!(second.graph, first.graph);
    assert_eq!(second.layout, first.layout);
    assert_eq!(second.report_version, 2);
}

#[test]
fn test_decompile_synthesizes_labels() {
    let graph = decompile(&reportgraph::create_sample()).unwrap();
    let label = |id: &str| graph.node(id).and_then(|n| n.label.clone()).unwrap();

    assert_eq!(label("n_entity"), "employee (5 fields)");
    assert_eq!(label("n_filter"), "Filter (4 conditions)");
    assert_eq!(label("n_link_org"), "org (oneToMany)");
    assert_eq!(label("n_transform"), "Transform (2 expressions)");
    assert_eq!(label("n_sheet_main"), "Employees Sheet (7 columns)");
    assert_eq!(label("n_export"), "Export XLSX");
}

#[test]
fn test_decompile_sample_keeps_positions_and_derives_edge_ids() {
    let sample = reportgraph::create_sample();
    let graph = decompile(&sample).unwrap();

    assert_eq!(graph.nodes.len(), sample.graph.nodes.len());
    assert_eq!(
        graph.node("n_sheet_main").unwrap().position,
        Some(Position::new(1250.0, 150.0))
    );
    assert_eq!(graph.edges[0].id, "edge-n_entity-n_filter");
    assert_eq!(graph.edges.len(), 10);
}

#[test]
fn test_decompile_parameter_top_keeps_digits_only() {
    let graph = decompile(&reportgraph::create_sample()).unwrap();
    let NodeConfig::Link(link) = &graph.node("n_link_org").unwrap().config else {
        panic!("expected link config");
    };
    // "@MaxConcat" has no digits to keep.
    assert_eq!(link.policy.as_ref().unwrap().top, None);
    assert_eq!(link.child_top_n, Some(25));
    assert_eq!(
        link.child_filters,
        Some(vec![UiFilterGroup {
            group_type: GroupType::And,
            conditions: vec![],
        }])
    );
}

#[test]
fn test_decompile_aggregate_sheet_reopens_as_child() {
    let graph = decompile(&reportgraph::create_sample()).unwrap();
    let NodeConfig::Sheet(sheet) = &graph.node("n_sheet_reviews").unwrap().config else {
        panic!("expected sheet config");
    };
    assert_eq!(sheet.mode, Some(UiSheetMode::Child));

    let formats: Vec<_> = sheet
        .columns
        .iter()
        .flatten()
        .map(|c| c.format)
        .collect();
    assert_eq!(
        formats,
        vec![
            Some(UiColumnFormat::Text),
            Some(UiColumnFormat::Number),
            Some(UiColumnFormat::Number),
        ]
    );
}

#[test]
fn test_decompile_rejects_link_without_relation() {
    let mut report = reportgraph::create_blank("Broken", "account");
    report.graph.nodes.push(ReportGraphNode {
        id: "lnk".to_string(),
        data: ReportNodeData::Link(LinkNodeData {
            relation: None,
            join_type: JoinType::Outer,
            alias: "x".to_string(),
            child_filters: None,
            child_order_by: None,
            child_top: None,
            child_fields: vec![],
            many_policy: None,
        }),
        position: None,
    });

    assert_eq!(
        decompile(&report),
        Err(DecompileError::MissingRelation {
            node_id: "lnk".to_string()
        })
    );
}

#[test]
fn test_decompile_maps_pdf_export_to_xlsx() {
    let mut report = reportgraph::create_blank("Pdf", "account");
    report.graph.nodes.push(ReportGraphNode {
        id: "x".to_string(),
        data: ReportNodeData::Export(ExportNodeData {
            format: ExportFormat::Pdf,
            layout: WorkbookMode::SingleSheet,
            file_name: "out.pdf".to_string(),
            include_metadata_sheet: None,
        }),
        position: None,
    });

    let graph = decompile(&report).unwrap();
    let NodeConfig::Export(export) = &graph.nodes[0].config else {
        panic!("expected export config");
    };
    assert_eq!(export.format, Some(ExportFormat::Xlsx));
}

#[test]
fn test_decompile_lays_out_unplaced_nodes() {
    let report: ReportDefinition = {
        let nodes = vec![
            entity_node("e", "account", &[]),
            sheet_node("s", "Accounts", &[]),
            export_node("x").at(0.0, 0.0),
        ];
        fixed_compiler().compile(&nodes, &[], None)
    };

    let graph = decompile(&report).unwrap();
    let positions: Vec<_> = graph.nodes.iter().map(|n| n.position).collect();
    assert_eq!(
        positions,
        vec![
            Some(Position::new(50.0, 50.0)),
            Some(Position::new(350.0, 50.0)),
            Some(Position::new(650.0, 50.0)),
        ]
    );
}

#[test]
fn test_decompile_from_stored_json() {
    let stored = json!({
        "schemaVersion": "1.0.0",
        "id": "r-1",
        "name": "Stored",
        "description": "",
        "owner": {"id": "u", "name": "U"},
        "tags": [],
        "primaryEntity": "contact",
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z",
        "reportVersion": 2,
        "security": {"executeAs": "caller", "allowedRoles": []},
        "parameters": [],
        "graph": {
            "nodes": [
                {"id": "e", "type": "entity", "data": {"entity": "contact", "attributes": []}},
                {"id": "f", "type": "filter", "data": {"logic": "and", "conditions": [
                    {"attribute": "statecode", "operator": "eq", "value": 0}
                ]}}
            ],
            "edges": [{"from": "e", "to": "f", "id": "custom"}]
        },
        "layout": {"workbook": {"mode": "singleSheet", "sheetsOrder": []}},
        "limits": {
            "pageSize": 5000, "previewRows": 100, "maxExpandedRows": 200000,
            "maxColumnsPerSheet": 100, "maxLinkDepth": 3, "defaultChildTop": 10
        },
        "hints": {"warnings": []}
    });
    let report: ReportDefinition = serde_json::from_value(stored).unwrap();
    let graph = decompile(&report).unwrap();

    assert_eq!(graph.edges[0].id, "custom");
    assert_eq!(graph.node("e").unwrap().label.as_deref(), Some("contact"));
    assert_eq!(
        graph.node("f").unwrap().label.as_deref(),
        Some("Filter (1 conditions)")
    );
    let NodeConfig::Filter(filter) = &graph.node("f").unwrap().config else {
        panic!("expected filter config");
    };
    assert_eq!(filter.filter_groups, None);
}
