use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TaskFlowError;
use crate::models::{TokenResponse, User};

const CREDENTIALS_FILE: &str = "credentials.json";
const WORKSPACE_FILE: &str = "current_workspace";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub user: User,
}

/// Persisted sign-in state and the currently-selected workspace id.
///
/// The workspace selection is a separate scalar entry so the task views can
/// resolve their scope without touching the credentials.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn open_default() -> Result<Self, TaskFlowError> {
        Ok(Self::new(super::state_dir()?))
    }

    pub fn save_credentials(&self, token: &TokenResponse) -> Result<(), TaskFlowError> {
        let creds = Credentials {
            access_token: token.access_token.clone(),
            user: token.user.clone(),
        };
        let data = serde_json::to_string_pretty(&creds)
            .map_err(|e| TaskFlowError::storage(e.to_string()))?;
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(CREDENTIALS_FILE), data)?;
        Ok(())
    }

    pub fn credentials(&self) -> Option<Credentials> {
        let raw = fs::read_to_string(self.dir.join(CREDENTIALS_FILE)).ok()?;
        match serde_json::from_str(&raw) {
            Ok(creds) => Some(creds),
            Err(e) => {
                debug!(err = %e, "stored credentials unreadable");
                None
            }
        }
    }

    pub fn clear_credentials(&self) -> Result<(), TaskFlowError> {
        match fs::remove_file(self.dir.join(CREDENTIALS_FILE)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn current_workspace(&self) -> Option<String> {
        let raw = fs::read_to_string(self.dir.join(WORKSPACE_FILE)).ok()?;
        let id = raw.trim().to_string();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    pub fn set_current_workspace(&self, workspace_id: &str) -> Result<(), TaskFlowError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(WORKSPACE_FILE), workspace_id)?;
        Ok(())
    }

    pub fn clear_current_workspace(&self) -> Result<(), TaskFlowError> {
        match fs::remove_file(self.dir.join(WORKSPACE_FILE)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
