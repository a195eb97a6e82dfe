//! Fixture definitions: the blank "new report" document and a richly
//! populated sample for first-time users.

use crate::clock::{Clock, IdSource, SystemClock, UuidSource};
use crate::definition::*;
use crate::graph::Position;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::collections::BTreeMap;

/// A version 1 definition with an empty graph and default policies.
pub fn create_blank(name: &str, primary_entity: &str) -> ReportDefinition {
    create_blank_with(name, primary_entity, &SystemClock, &UuidSource)
}

pub fn create_blank_with(
    name: &str,
    primary_entity: &str,
    clock: &dyn Clock,
    ids: &dyn IdSource,
) -> ReportDefinition {
    let now = clock.now();
    ReportDefinition {
        schema_version: SCHEMA_VERSION.to_string(),
        id: ids.next_id("report"),
        name: name.to_string(),
        description: String::new(),
        owner: Owner::default(),
        category_id: None,
        tags: Vec::new(),
        primary_entity: primary_entity.to_string(),
        created_at: now,
        updated_at: now,
        report_version: 1,
        security: Security::default(),
        parameters: Vec::new(),
        graph: ReportGraph::default(),
        layout: Layout::default(),
        limits: Limits::default(),
        hints: Hints {
            row_estimate: Some(RowEstimate {
                base: 0,
                org_avg: None,
                expand_estimate: Some(0),
            }),
            warnings: Vec::new(),
            estimated_execution_time: None,
        },
        artifacts: None,
    }
}

/// A fresh copy of the sample report: new id, current timestamps, version 1.
pub fn create_sample() -> ReportDefinition {
    create_sample_with(&SystemClock, &UuidSource)
}

pub fn create_sample_with(clock: &dyn Clock, ids: &dyn IdSource) -> ReportDefinition {
    let now = clock.now();
    let mut report = sample_report();
    report.id = ids.next_id("sample-report");
    report.created_at = now;
    report.updated_at = now;
    report.report_version = 1;
    report
}

fn sample_report() -> ReportDefinition {
    ReportDefinition {
        schema_version: SCHEMA_VERSION.to_string(),
        id: "df6f8b9a-0d6e-4b8d-9d59-0a8a4f4b6c11".to_string(),
        name: "Employees + Orgs + Reviews (Master)".to_string(),
        description: "Main employee export with organization info (concat + child sheet) \
                      and review summary."
            .to_string(),
        owner: Owner {
            id: "00000000-0000-0000-0000-000000000001".to_string(),
            name: "Report Admin".to_string(),
        },
        category_id: None,
        tags: strings(&["hr", "employees", "kpi"]),
        primary_entity: "employee".to_string(),
        created_at: sample_time(30),
        updated_at: sample_time(35),
        report_version: 7,
        security: Security::default(),
        parameters: sample_parameters(),
        graph: ReportGraph {
            nodes: sample_nodes(),
            edges: [
                ("n_entity", "n_filter"),
                ("n_filter", "n_link_org"),
                ("n_filter", "n_link_review"),
                ("n_filter", "n_transform"),
                ("n_link_org", "n_sheet_main"),
                ("n_link_review", "n_sheet_main"),
                ("n_link_org_childsheet", "n_sheet_main"),
                ("n_transform", "n_sheet_main"),
                ("n_sheet_main", "n_export"),
                ("n_sheet_reviews", "n_export"),
            ]
            .into_iter()
            .map(|(from, to)| ReportGraphEdge {
                from: from.to_string(),
                to: to.to_string(),
                id: None,
            })
            .collect(),
        },
        layout: Layout {
            workbook: WorkbookLayout {
                mode: WorkbookMode::MultiSheet,
                sheets_order: strings(&["Employees", "OrganizationInfo", "ReviewSummary"]),
                metadata_sheet: Some(MetadataSheet::default()),
            },
        },
        limits: Limits::default(),
        hints: Hints {
            row_estimate: Some(RowEstimate {
                base: 7542,
                org_avg: Some(3.2),
                expand_estimate: Some(24134),
            }),
            warnings: vec!["Concatenate limited to @MaxConcat items per employee.".to_string()],
            estimated_execution_time: None,
        },
        artifacts: Some(sample_artifacts()),
    }
}

fn sample_parameters() -> Vec<Parameter> {
    let parameter = |name: &str, param_type, default, label: &str| Parameter {
        name: name.to_string(),
        param_type,
        default: Some(default),
        min: None,
        max: None,
        label: label.to_string(),
        description: None,
        required: None,
        options: None,
    };

    vec![
        parameter(
            "OnlyActive",
            ParameterType::Boolean,
            json!(true),
            "Only active employees",
        ),
        parameter(
            "HiredAfter",
            ParameterType::Date,
            json!("2018-01-01"),
            "Hire date >= ?",
        ),
        Parameter {
            min: Some(1.0),
            max: Some(50.0),
            ..parameter("MaxConcat", ParameterType::Number, json!(5), "Max orgs to list")
        },
    ]
}

fn sample_nodes() -> Vec<ReportGraphNode> {
    let employee_orginfos = Relation {
        direction: RelationDirection::OneToMany,
        schema_name: "employee_orginfos".to_string(),
        from: "employeeid".to_string(),
        to: "employeeid".to_string(),
        target: "orginfo".to_string(),
    };
    let newest_first = || vec![SortKey::desc("startdate")];

    vec![
        node(
            "n_entity",
            (50.0, 50.0),
            ReportNodeData::Entity(EntityNodeData {
                entity: "employee".to_string(),
                attributes: strings(&[
                    "employeeid",
                    "fullname",
                    "email",
                    "hiredate",
                    "departmentid.name",
                ]),
                order_by: vec![SortKey::asc("fullname")],
                timezone_behavior: Some(Timezone::User),
                top: None,
            }),
        ),
        node(
            "n_filter",
            (350.0, 50.0),
            ReportNodeData::Filter(FilterNodeData {
                logic: Logic::And,
                conditions: vec![
                    FilterCondition {
                        label: Some("Active".to_string()),
                        ..condition("statecode", Operator::Eq, json!(0))
                    },
                    condition("hiredate", Operator::OnOrAfter, json!("@HiredAfter")),
                ],
                groups: Some(vec![FilterGroup {
                    logic: Logic::Or,
                    conditions: vec![
                        condition("departmentid.name", Operator::Eq, json!("R&D")),
                        condition("departmentid.name", Operator::Eq, json!("IT")),
                    ],
                }]),
            }),
        ),
        node(
            "n_link_org",
            (650.0, 50.0),
            ReportNodeData::Link(LinkNodeData {
                relation: Some(employee_orginfos.clone()),
                join_type: JoinType::Outer,
                alias: "org".to_string(),
                child_filters: Some(Vec::new()),
                child_order_by: Some(newest_first()),
                child_top: Some(25),
                child_fields: strings(&["orginfoid", "name", "type", "startdate"]),
                many_policy: Some(ManyPolicy {
                    field: Some("name".to_string()),
                    delimiter: Some("; ".to_string()),
                    order_by: Some(newest_first()),
                    top: Some(TopValue::Param("@MaxConcat".to_string())),
                    output_alias: Some("Organizations".to_string()),
                    ..policy(PolicyKind::Concat)
                }),
            }),
        ),
        node(
            "n_link_review",
            (650.0, 200.0),
            ReportNodeData::Link(LinkNodeData {
                relation: Some(Relation {
                    schema_name: "employee_reviews".to_string(),
                    target: "performancereview".to_string(),
                    ..employee_orginfos.clone()
                }),
                join_type: JoinType::Outer,
                alias: "rev".to_string(),
                child_filters: None,
                child_order_by: None,
                child_top: None,
                child_fields: strings(&["reviewid", "title", "rating", "period"]),
                many_policy: Some(ManyPolicy {
                    measures: Some(vec![
                        Measure {
                            func: MeasureFunc::Count,
                            attribute: None,
                            alias: "ReviewCount".to_string(),
                        },
                        Measure {
                            func: MeasureFunc::Avg,
                            attribute: Some("rating".to_string()),
                            alias: "AvgRating".to_string(),
                        },
                    ]),
                    group_by_child: Some(Vec::new()),
                    ..policy(PolicyKind::Summarize)
                }),
            }),
        ),
        node(
            "n_link_org_childsheet",
            (650.0, 350.0),
            ReportNodeData::Link(LinkNodeData {
                relation: Some(employee_orginfos),
                join_type: JoinType::Outer,
                alias: "orgAll".to_string(),
                child_filters: None,
                child_order_by: None,
                child_top: None,
                child_fields: strings(&["orginfoid", "employeeid", "name", "type", "startdate"]),
                many_policy: Some(ManyPolicy {
                    sheet_name: Some("OrganizationInfo".to_string()),
                    columns: Some(strings(&["employeeid", "name", "type", "startdate"])),
                    order_by: Some(newest_first()),
                    ..policy(PolicyKind::ChildSheet)
                }),
            }),
        ),
        node(
            "n_transform",
            (950.0, 50.0),
            ReportNodeData::Transform(TransformNodeData {
                expressions: vec![
                    TransformExpression {
                        alias: "YearOfHire".to_string(),
                        expr: "year(hiredate)".to_string(),
                    },
                    TransformExpression {
                        alias: "EmailDomain".to_string(),
                        expr: "rightOf(email,'@')".to_string(),
                    },
                ],
            }),
        ),
        node(
            "n_sheet_main",
            (1250.0, 150.0),
            ReportNodeData::Sheet(SheetNodeData {
                name: "Employees".to_string(),
                mode: SheetMode::Main,
                columns: vec![
                    column("fullname", "Employee", Some(28)),
                    column("email", "Email", Some(32)),
                    SheetColumn {
                        format: Some(ColumnFormat::Number),
                        align: Some(Align::Center),
                        ..column("YearOfHire", "Hire Year", Some(12))
                    },
                    column("departmentid.name", "Department", Some(20)),
                    SheetColumn {
                        wrap: Some(true),
                        ..column("Organizations", "Organizations (latest first)", Some(40))
                    },
                    SheetColumn {
                        format: Some(ColumnFormat::Number),
                        align: Some(Align::Right),
                        ..column("ReviewCount", "Reviews", Some(10))
                    },
                    SheetColumn {
                        format: Some(ColumnFormat::Number1),
                        align: Some(Align::Right),
                        ..column("AvgRating", "Avg Rating", Some(12))
                    },
                ],
                freeze: Some(SheetFreeze {
                    rows: Some(1),
                    columns: Some(1),
                }),
                styles: Some(SheetStyles {
                    zebra: Some(true),
                    header_bold: Some(true),
                    auto_filter: Some(true),
                }),
                hyperlinks: Some(SheetHyperlinks {
                    child_sheet_links: Some(true),
                }),
            }),
        ),
        node(
            "n_sheet_reviews",
            (1250.0, 350.0),
            ReportNodeData::Sheet(SheetNodeData {
                name: "ReviewSummary".to_string(),
                mode: SheetMode::Aggregate,
                columns: vec![
                    column("employeeid", "EmployeeId", Some(18)),
                    SheetColumn {
                        format: Some(ColumnFormat::Number),
                        ..column("ReviewCount", "Total Reviews", None)
                    },
                    SheetColumn {
                        format: Some(ColumnFormat::Number2),
                        ..column("AvgRating", "Average Rating", None)
                    },
                ],
                freeze: None,
                styles: None,
                hyperlinks: None,
            }),
        ),
        node(
            "n_export",
            (1550.0, 250.0),
            ReportNodeData::Export(ExportNodeData {
                format: ExportFormat::Xlsx,
                layout: WorkbookMode::MultiSheet,
                file_name: "Employees_{yyyyMMdd_HHmm}.xlsx".to_string(),
                include_metadata_sheet: Some(true),
            }),
        ),
    ]
}

fn sample_artifacts() -> Artifacts {
    let mut aggregate_fetches = BTreeMap::new();
    aggregate_fetches.insert(
        "n_link_review".to_string(),
        "<fetch aggregate=\"true\" ...> ... </fetch>".to_string(),
    );

    let mut child_plans = BTreeMap::new();
    child_plans.insert(
        "OrganizationInfo".to_string(),
        ChildPlan {
            target_entity: "orginfo".to_string(),
            parent_key: "employeeid".to_string(),
            select: strings(&["employeeid", "name", "type", "startdate"]),
            order_by: Some(vec![SortKey::desc("startdate")]),
            filters: None,
        },
    );

    Artifacts {
        compiler_version: "rg-compile/1.0.0".to_string(),
        compiled_at: "2025-10-12T09:35:00Z".to_string(),
        metadata_snapshot: MetadataSnapshotRef {
            id: "snap-2025-10-12".to_string(),
            version: "2025.10.12-01".to_string(),
            lcid: 1033,
        },
        primary_fetch_xml: Some("<fetch ...> ... </fetch>".to_string()),
        aggregate_fetches: Some(aggregate_fetches),
        child_plans: Some(child_plans),
    }
}

/// 2025-10-12 09:`minute`:00 UTC.
fn sample_time(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 12, 9, minute, 0)
        .single()
        .unwrap_or_default()
}

fn node(id: &str, (x, y): (f64, f64), data: ReportNodeData) -> ReportGraphNode {
    ReportGraphNode {
        id: id.to_string(),
        data,
        position: Some(Position::new(x, y)),
    }
}

fn condition(attribute: &str, operator: Operator, value: serde_json::Value) -> FilterCondition {
    FilterCondition {
        attribute: attribute.to_string(),
        operator,
        value,
        label: None,
    }
}

fn policy(kind: PolicyKind) -> ManyPolicy {
    ManyPolicy {
        kind,
        field: None,
        delimiter: None,
        order_by: None,
        top: None,
        output_alias: None,
        measures: None,
        group_by_child: None,
        sheet_name: None,
        columns: None,
    }
}

fn column(key: &str, title: &str, width: Option<u32>) -> SheetColumn {
    SheetColumn {
        key: key.to_string(),
        title: title.to_string(),
        width,
        format: None,
        align: None,
        wrap: None,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
