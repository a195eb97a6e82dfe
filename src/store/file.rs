use super::ReportStore;
use crate::definition::ReportDefinition;
use crate::error::StoreError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Stores each definition as a pretty-printed `<id>.json` file in one
/// directory, with an in-memory copy for reads.
///
/// # Example
///
/// ```no_run
/// use reportgraph::store::{FileStore, ReportStore};
///
/// let mut store = FileStore::new(".reports");
/// let loaded = store.load_from_disk()?;
/// println!("Loaded {} reports", loaded);
///
/// store.put(reportgraph::create_blank("Headcount", "employee"))?;
/// # Ok::<(), reportgraph::error::StoreError>(())
/// ```
#[derive(Debug)]
pub struct FileStore {
    reports: BTreeMap<String, ReportDefinition>,
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            reports: BTreeMap::new(),
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads every `*.json` file of the directory. Files that do not hold a
    /// report definition are skipped with a warning.
    ///
    /// Returns the number of definitions loaded.
    pub fn load_from_disk(&mut self) -> Result<usize, StoreError> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in std::fs::read_dir(&self.dir).map_err(|e| io_error(&self.dir, e))? {
            let file_path = entry.map_err(|e| io_error(&self.dir, e))?.path();
            if file_path.extension().is_none_or(|e| e != "json") {
                continue;
            }

            let content = std::fs::read_to_string(&file_path).map_err(|e| io_error(&file_path, e))?;
            match serde_json::from_str::<ReportDefinition>(&content) {
                Ok(report) => {
                    log::info!("Loaded report '{}' from {:?}", report.id, file_path);
                    self.reports.insert(report.id.clone(), report);
                    count += 1;
                }
                Err(e) => {
                    log::warn!("Skipping {:?}: not a report definition: {}", file_path, e);
                }
            }
        }
        Ok(count)
    }

    fn file_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(id)))
    }

    fn save_to_disk(&self, report: &ReportDefinition) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let file_path = self.file_path(&report.id);
        let content =
            serde_json::to_string_pretty(report).map_err(|source| StoreError::Serialization {
                id: report.id.clone(),
                source,
            })?;
        std::fs::write(&file_path, content).map_err(|e| io_error(&file_path, e))?;
        log::debug!("Saved report '{}' to {:?}", report.id, file_path);
        Ok(())
    }

    fn delete_from_disk(&self, id: &str) -> Result<(), StoreError> {
        let file_path = self.file_path(id);
        if file_path.exists() {
            std::fs::remove_file(&file_path).map_err(|e| io_error(&file_path, e))?;
            log::debug!("Deleted report '{}' from {:?}", id, file_path);
        }
        Ok(())
    }
}

impl ReportStore for FileStore {
    fn list(&self) -> Vec<&ReportDefinition> {
        self.reports.values().collect()
    }

    fn get(&self, id: &str) -> Option<&ReportDefinition> {
        self.reports.get(id)
    }

    fn put(&mut self, report: ReportDefinition) -> Result<(), StoreError> {
        self.save_to_disk(&report)?;
        self.reports.insert(report.id.clone(), report);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        self.delete_from_disk(id)?;
        Ok(self.reports.remove(id).is_some())
    }
}

/// File name stem for a report id. Ids made only of ASCII alphanumerics, `-`,
/// `_` and `.` are used as is. Any other id is sanitized and suffixed with
/// `~` and a hash of the raw id; `~` never appears in a plain stem, so
/// distinct ids never share a file.
fn file_stem(id: &str) -> String {
    let is_plain = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if id.chars().all(is_plain) {
        return id.to_string();
    }

    let sanitized: String = id
        .chars()
        .map(|c| if is_plain(c) { c } else { '_' })
        .collect();
    let hash = blake3::hash(id.as_bytes()).to_hex();
    format!("{}~{}", sanitized, &hash[..16])
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
