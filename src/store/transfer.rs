//! Export and import of report bundles.
//!
//! A bundle is a JSON document `{version, reports, exportedAt, exportedBy}`.
//! Imports validate each record on its own: a bad record is reported and
//! skipped while the others are still imported.

use super::{ReportLibrary, ReportStore};
use crate::definition::{ReportDefinition, ReportNodeData, UNKNOWN_ENTITY};
use crate::error::ImportError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format version written into every bundle.
pub const BUNDLE_VERSION: &str = "1.0.0";

pub const DEFAULT_EXPORTED_BY: &str = "Excel Generator User";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub version: String,
    pub reports: Vec<ReportDefinition>,
    pub exported_at: DateTime<Utc>,
    pub exported_by: String,
}

/// Result of an import that got past parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub imported: usize,
    /// One message per rejected record, e.g. `Report 2: Missing required fields`.
    pub errors: Vec<String>,
}

impl ImportOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

const REQUIRED_FIELDS: [&str; 3] = ["id", "name", "schemaVersion"];

impl<S: ReportStore> ReportLibrary<S> {
    /// Bundles the reports with the given ids, or every report when `ids` is
    /// `None`. Unknown ids are ignored.
    pub fn export_bundle(&self, ids: Option<&[&str]>) -> ExportBundle {
        let reports = self
            .store
            .list()
            .into_iter()
            .filter(|report| ids.is_none_or(|ids| ids.contains(&report.id.as_str())))
            .cloned()
            .collect();

        ExportBundle {
            version: BUNDLE_VERSION.to_string(),
            reports,
            exported_at: self.clock.now(),
            exported_by: DEFAULT_EXPORTED_BY.to_string(),
        }
    }

    /// Imports every valid record of a bundle.
    ///
    /// Only `id`, `name` and `schemaVersion` are required. Records whose id is
    /// already stored get a fresh `-imported-` id and an `(Imported)` name
    /// suffix. Imported reports restart at version 1 with timestamps set to
    /// now. A record without `primaryEntity` takes its first entity node's
    /// name, or `"unknown"`.
    pub fn import_bundle(&mut self, json: &str) -> Result<ImportOutcome, ImportError> {
        let document: Value = serde_json::from_str(json)?;
        let records = document
            .get("reports")
            .and_then(Value::as_array)
            .ok_or_else(|| ImportError::InvalidFormat("missing reports array".to_string()))?;

        let mut outcome = ImportOutcome::default();
        for (index, record) in records.iter().enumerate() {
            let number = index + 1;
            match self.import_record(record) {
                Ok(id) => {
                    log::debug!("Imported report {} as '{}'", number, id);
                    outcome.imported += 1;
                }
                Err(message) => {
                    let message = format!("Report {number}: {message}");
                    log::warn!("{message}");
                    outcome.errors.push(message);
                }
            }
        }

        log::info!(
            "Imported {} of {} reports ({} rejected)",
            outcome.imported,
            records.len(),
            outcome.errors.len()
        );
        Ok(outcome)
    }

    fn import_record(&mut self, record: &Value) -> Result<String, String> {
        let complete = REQUIRED_FIELDS.iter().all(|field| {
            record
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty())
        });
        if !complete {
            return Err("Missing required fields".to_string());
        }

        // Fields reset on import are not required from the record.
        let now = serde_json::to_value(self.clock.now()).map_err(|e| e.to_string())?;
        let mut record = record.clone();
        if let Some(fields) = record.as_object_mut() {
            fields.insert("createdAt".to_string(), now.clone());
            fields.insert("updatedAt".to_string(), now);
            fields.insert("reportVersion".to_string(), Value::from(1));
            if !fields.get("primaryEntity").is_some_and(Value::is_string) {
                fields.insert("primaryEntity".to_string(), Value::String(String::new()));
            }
        }

        let mut report: ReportDefinition =
            serde_json::from_value(record).map_err(|e| e.to_string())?;
        if report.primary_entity.is_empty() {
            report.primary_entity = first_entity(&report).unwrap_or(UNKNOWN_ENTITY).to_string();
        }

        if self.store.contains(&report.id) {
            report.id = format!("{}-{}", report.id, self.ids.next_id("imported"));
            report.name = format!("{} (Imported)", report.name);
        }

        let id = report.id.clone();
        self.store.put(report).map_err(|e| e.to_string())?;
        Ok(id)
    }
}

/// Logical name of the first entity node, the same rule the compiler uses for
/// `primaryEntity`.
fn first_entity(report: &ReportDefinition) -> Option<&str> {
    report.graph.nodes.iter().find_map(|node| match &node.data {
        ReportNodeData::Entity(entity) => Some(entity.entity.as_str()),
        _ => None,
    })
}
