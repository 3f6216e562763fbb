//! Directory-backed solution store: one JSON file per solution.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::ArenaError;
use crate::solution::{is_solution_id, SolutionRecord};

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct SolutionStore {
    root: PathBuf,
}

impl SolutionStore {
    /// Opens `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ArenaError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| ArenaError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<id>.json`.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidId`] unless `id` has the shape of a solution id,
    /// so no id can name a path outside the root.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, ArenaError> {
        if !is_solution_id(id) {
            return Err(ArenaError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.{EXTENSION}")))
    }

    /// Writes `record` to `<root>/<solution_id>.json`, replacing any
    /// previous version.
    pub fn save(&self, record: &SolutionRecord) -> Result<PathBuf, ArenaError> {
        let path = self.path_for(record.id())?;
        let json = serde_json::to_string_pretty(record)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| ArenaError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| ArenaError::io(&path, e))?;
        debug!(solution = record.id(), path = %path.display(), "saved solution");
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<SolutionRecord, ArenaError> {
        let path = self.path_for(id)?;
        if !path.is_file() {
            return Err(ArenaError::NotFound(id.to_string()));
        }
        read_record(&path)
    }

    /// Every readable record, sorted by id. Unreadable files, and records
    /// whose id does not match their file name, are skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<SolutionRecord>, ArenaError> {
        let entries = fs::read_dir(&self.root).map_err(|e| ArenaError::io(&self.root, e))?;
        let mut records = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let record = match read_record(&path) {
                Ok(record) => record,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping solution file");
                    continue;
                }
            };
            let stem = path.file_stem().and_then(|s| s.to_str());
            if !is_solution_id(record.id()) || stem != Some(record.id()) {
                warn!(
                    path = %path.display(),
                    solution = record.id(),
                    "skipping solution file whose id does not match its name"
                );
                continue;
            }
            records.push(record);
        }
        records.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(records)
    }

    /// True when a stored record has the same content hash.
    pub fn contains(&self, content_hash: &str) -> Result<bool, ArenaError> {
        Ok(self
            .load_all()?
            .iter()
            .any(|r| r.content_hash == content_hash))
    }
}

fn read_record(path: &Path) -> Result<SolutionRecord, ArenaError> {
    let text = fs::read_to_string(path).map_err(|e| ArenaError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| ArenaError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
