//! The storage collaborator: whole report definitions keyed by id.
//!
//! The core never depends on how definitions are stored. [`ReportStore`] is
//! the contract; [`MemoryStore`] and [`FileStore`] are small reference
//! implementations, and [`ReportLibrary`] layers the list/search/duplicate and
//! import/export operations of a report manager on top of any store.

pub mod file;
pub mod library;
pub mod memory;
pub mod transfer;

pub use file::*;
pub use library::*;
pub use memory::*;
pub use transfer::*;

use crate::definition::ReportDefinition;
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document store keyed by report id.
pub trait ReportStore {
    /// Every stored definition.
    fn list(&self) -> Vec<&ReportDefinition>;

    fn get(&self, id: &str) -> Option<&ReportDefinition>;

    /// Inserts or wholly replaces the definition with the same id.
    fn put(&mut self, report: ReportDefinition) -> Result<(), StoreError>;

    /// Removes a definition. Returns whether it existed.
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

/// Lightweight list item for report pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub primary_entity: String,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub report_version: u32,
}

impl From<&ReportDefinition> for ReportSummary {
    fn from(report: &ReportDefinition) -> Self {
        Self {
            id: report.id.clone(),
            name: report.name.clone(),
            description: report.description.clone(),
            primary_entity: report.primary_entity.clone(),
            tags: report.tags.clone(),
            updated_at: report.updated_at,
            report_version: report.report_version,
        }
    }
}
