use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::error::TaskFlowError;
use crate::models::TaskStatus;

const CACHE_FILE: &str = "kanban-statuses.json";

/// Durable task-id → kanban-status map, shared by the list and board views.
///
/// Advisory only: a fresh gateway response always supersedes whatever is
/// stored here. Reads never fail; an absent or corrupt file is an empty map.
pub struct StatusCache {
    path: PathBuf,
}

impl StatusCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn open_default() -> Result<Self, TaskFlowError> {
        Ok(Self::new(super::state_dir()?.join(CACHE_FILE)))
    }

    pub fn read(&self) -> HashMap<String, TaskStatus> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                debug!(err = %e, "status cache unreadable, treating as empty");
                HashMap::new()
            }
        }
    }

    /// Merge one entry into the persisted map. Last write wins.
    pub fn write(&self, task_id: &str, status: TaskStatus) -> Result<(), TaskFlowError> {
        let mut statuses = self.read();
        statuses.insert(task_id.to_string(), status);
        self.persist(&statuses)
    }

    pub fn remove(&self, task_id: &str) -> Result<(), TaskFlowError> {
        let mut statuses = self.read();
        if statuses.remove(task_id).is_some() {
            self.persist(&statuses)?;
        }
        Ok(())
    }

    fn persist(&self, statuses: &HashMap<String, TaskStatus>) -> Result<(), TaskFlowError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Atomic-ish write via temp + rename.
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(statuses)
            .map_err(|e| TaskFlowError::storage(e.to_string()))?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}
