use crate::definition::*;

/// Row estimate used for entities the table below does not list.
pub const DEFAULT_ROW_ESTIMATE: u64 = 1000;

const ROW_ESTIMATES: &[(&str, u64)] = &[
    ("employee", 2500),
    ("account", 5000),
    ("contact", 10000),
    ("opportunity", 3000),
    ("case", 8000),
];

/// Rough row count of an entity, looked up case-insensitively.
pub fn estimate_entity_rows(entity: &str) -> u64 {
    ROW_ESTIMATES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(entity))
        .map_or(DEFAULT_ROW_ESTIMATE, |(_, rows)| *rows)
}

fn entity_nodes(nodes: &[ReportGraphNode]) -> impl Iterator<Item = &EntityNodeData> {
    nodes.iter().filter_map(|n| match &n.data {
        ReportNodeData::Entity(entity) => Some(entity),
        _ => None,
    })
}

fn sheet_nodes(nodes: &[ReportGraphNode]) -> impl Iterator<Item = (&str, &SheetNodeData)> {
    nodes.iter().filter_map(|n| match &n.data {
        ReportNodeData::Sheet(sheet) => Some((n.id.as_str(), sheet)),
        _ => None,
    })
}

/// The first entity node's logical name.
pub(super) fn primary_entity(nodes: &[ReportGraphNode]) -> Option<&str> {
    entity_nodes(nodes).next().map(|e| e.entity.as_str())
}

/// Sheets in encounter order; more than one sheet means a multi-sheet workbook.
pub(super) fn workbook_layout(nodes: &[ReportGraphNode]) -> Layout {
    let sheets_order: Vec<String> = sheet_nodes(nodes).map(|(_, s)| s.name.clone()).collect();
    let mode = if sheets_order.len() > 1 {
        WorkbookMode::MultiSheet
    } else {
        WorkbookMode::SingleSheet
    };

    Layout {
        workbook: WorkbookLayout {
            mode,
            sheets_order,
            metadata_sheet: Some(MetadataSheet::default()),
        },
    }
}

pub(super) fn build_hints(nodes: &[ReportGraphNode]) -> Hints {
    let entity_count = entity_nodes(nodes).count();
    let sheet_count = sheet_nodes(nodes).count();
    let link_count = nodes
        .iter()
        .filter(|n| matches!(n.data, ReportNodeData::Link(_)))
        .count();

    let mut warnings = Vec::new();
    if entity_count == 0 {
        warnings.push("No entity nodes found - report may not function correctly".to_string());
    }
    if entity_count > 1 {
        warnings.push(
            "Multiple entity nodes detected - only the first will be used as primary".to_string(),
        );
    }
    if sheet_count == 0 {
        warnings.push("No sheet nodes found - add a sheet to define output format".to_string());
    }

    let base = primary_entity(nodes).map_or(DEFAULT_ROW_ESTIMATE, estimate_entity_rows);
    let expand_estimate = if link_count > 0 {
        (base as f64 * link_count as f64 * 2.5).floor() as u64
    } else {
        base
    };

    Hints {
        row_estimate: Some(RowEstimate {
            base,
            org_avg: None,
            expand_estimate: Some(expand_estimate),
        }),
        warnings,
        estimated_execution_time: None,
    }
}

/// Warns about sheets that were aggregate sheets in `prior` and no longer are.
/// The editor cannot express aggregate sheets, so editing one downgrades it.
pub(super) fn downgrade_warnings(prior: &ReportGraph, nodes: &[ReportGraphNode]) -> Vec<String> {
    let was_aggregate = |id: &str| {
        prior.nodes.iter().any(|n| {
            n.id == id
                && matches!(&n.data, ReportNodeData::Sheet(s) if s.mode == SheetMode::Aggregate)
        })
    };

    sheet_nodes(nodes)
        .filter(|(id, sheet)| sheet.mode != SheetMode::Aggregate && was_aggregate(*id))
        .map(|(id, sheet)| {
            let mode = match sheet.mode {
                SheetMode::Main => "main",
                SheetMode::Aggregate => "aggregate",
                SheetMode::Child => "child",
            };
            format!("Sheet '{}' ({id}) was an aggregate sheet and is now compiled as {mode}", sheet.name)
        })
        .collect()
}
