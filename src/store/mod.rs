pub mod session;
pub mod status_cache;

pub use session::SessionStore;
pub use status_cache::StatusCache;

use std::env;
use std::path::PathBuf;

use crate::error::TaskFlowError;

/// Directory holding all client-side state (credentials, workspace selection,
/// kanban status cache). `TASKFLOW_STATE_DIR` overrides the default under the
/// user's home directory.
pub fn state_dir() -> Result<PathBuf, TaskFlowError> {
    if let Ok(dir) = env::var("TASKFLOW_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map_err(|_| {
            TaskFlowError::storage("Cannot resolve state directory: HOME is not set")
        })?;
    Ok(PathBuf::from(home).join(".taskflow"))
}
