use super::{ReportStore, ReportSummary};
use crate::clock::{Clock, IdSource, SystemClock, UuidSource};
use crate::definition::ReportDefinition;
use crate::error::StoreError;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Report-manager operations over any [`ReportStore`].
///
/// New identifiers and timestamps come from the injected [`Clock`] and
/// [`IdSource`]; [`ReportLibrary::new`] uses the system clock and UUIDs.
pub struct ReportLibrary<S: ReportStore> {
    pub(crate) store: S,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) ids: Box<dyn IdSource>,
}

/// Counts over every stored report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStatistics {
    pub total_reports: usize,
    pub total_entities: usize,
    pub total_tags: usize,
    /// Latest `updatedAt` among the reports.
    pub last_updated: Option<DateTime<Utc>>,
    pub entity_breakdown: Vec<EntityCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    pub entity: String,
    pub count: usize,
}

impl<S: ReportStore> ReportLibrary<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            ids: Box::new(UuidSource),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn get(&self, id: &str) -> Option<&ReportDefinition> {
        self.store.get(id)
    }

    /// Stores the definition as given, replacing any report with the same id.
    pub fn save(&mut self, report: ReportDefinition) -> Result<(), StoreError> {
        self.store.put(report)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(id)
    }

    pub fn summaries(&self) -> Vec<ReportSummary> {
        self.store.list().into_iter().map(ReportSummary::from).collect()
    }

    /// Copies a report under a fresh id, restarting its version history.
    ///
    /// The copy is named `new_name`, or `"<name> (Copy)"` when none is given.
    /// Returns `None` when `id` is not stored.
    pub fn duplicate(
        &mut self,
        id: &str,
        new_name: Option<&str>,
    ) -> Result<Option<ReportDefinition>, StoreError> {
        let Some(original) = self.store.get(id) else {
            return Ok(None);
        };

        let now = self.clock.now();
        let mut copy = original.clone();
        copy.id = format!("{}-{}", original.id, self.ids.next_id("copy"));
        copy.name = match new_name {
            Some(name) => name.to_string(),
            None => format!("{} (Copy)", original.name),
        };
        copy.created_at = now;
        copy.updated_at = now;
        copy.report_version = 1;

        log::info!("Duplicated report '{}' as '{}'", id, copy.id);
        self.store.put(copy.clone())?;
        Ok(Some(copy))
    }

    /// Case-insensitive substring match over name, description, tags and
    /// primary entity.
    pub fn search(&self, query: &str) -> Vec<ReportSummary> {
        let needle = query.to_lowercase();
        self.matching(|report| {
            report.name.to_lowercase().contains(&needle)
                || report.description.to_lowercase().contains(&needle)
                || report.primary_entity.to_lowercase().contains(&needle)
                || report.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
    }

    pub fn by_entity(&self, entity: &str) -> Vec<ReportSummary> {
        self.matching(|report| report.primary_entity == entity)
    }

    pub fn by_tag(&self, tag: &str) -> Vec<ReportSummary> {
        self.matching(|report| report.tags.iter().any(|t| t == tag))
    }

    /// Distinct tags, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        self.store
            .list()
            .into_iter()
            .flat_map(|report| report.tags.iter().cloned())
            .sorted()
            .dedup()
            .collect()
    }

    /// Distinct primary entities, sorted.
    pub fn all_entities(&self) -> Vec<String> {
        self.store
            .list()
            .into_iter()
            .map(|report| report.primary_entity.clone())
            .sorted()
            .dedup()
            .collect()
    }

    pub fn statistics(&self) -> LibraryStatistics {
        let reports = self.store.list();

        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for report in &reports {
            *counts.entry(report.primary_entity.as_str()).or_default() += 1;
        }
        let entity_breakdown = counts
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .map(|(entity, count)| EntityCount {
                entity: entity.to_string(),
                count,
            })
            .collect_vec();

        LibraryStatistics {
            total_reports: reports.len(),
            total_entities: entity_breakdown.len(),
            total_tags: self.all_tags().len(),
            last_updated: reports.iter().map(|r| r.updated_at).max(),
            entity_breakdown,
        }
    }

    fn matching(&self, predicate: impl Fn(&ReportDefinition) -> bool) -> Vec<ReportSummary> {
        self.store
            .list()
            .into_iter()
            .filter(|report| predicate(*report))
            .map(ReportSummary::from)
            .collect()
    }
}
