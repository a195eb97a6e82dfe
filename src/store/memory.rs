use super::ReportStore;
use crate::definition::ReportDefinition;
use crate::error::StoreError;

/// Keeps definitions in insertion order. Replacing a definition keeps its slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    reports: Vec<ReportDefinition>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl FromIterator<ReportDefinition> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = ReportDefinition>>(iter: I) -> Self {
        let mut store = Self::new();
        for report in iter {
            store.upsert(report);
        }
        store
    }
}

impl MemoryStore {
    fn upsert(&mut self, report: ReportDefinition) {
        match self.reports.iter_mut().find(|r| r.id == report.id) {
            Some(slot) => *slot = report,
            None => self.reports.push(report),
        }
    }
}

impl ReportStore for MemoryStore {
    fn list(&self) -> Vec<&ReportDefinition> {
        self.reports.iter().collect()
    }

    fn get(&self, id: &str) -> Option<&ReportDefinition> {
        self.reports.iter().find(|r| r.id == id)
    }

    fn put(&mut self, report: ReportDefinition) -> Result<(), StoreError> {
        self.upsert(report);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.reports.len();
        self.reports.retain(|r| r.id != id);
        Ok(self.reports.len() < before)
    }
}
