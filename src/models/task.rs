use serde::{Deserialize, Serialize};

use crate::error::TaskFlowError;

pub const TITLE_MAX_LEN: usize = 500;
pub const DESCRIPTION_MAX_LEN: usize = 5000;

/// Prefix for client-assigned ids of tasks whose create call is still in flight.
pub const TEMP_ID_PREFIX: &str = "temp-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Kanban column order.
    pub const ALL: [TaskStatus; 4] = [
        Self::ToDo,
        Self::InProgress,
        Self::Review,
        Self::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "TO_DO",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Done => "DONE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "TO_DO" => Some(Self::ToDo),
            "IN_PROGRESS" => Some(Self::InProgress),
            "REVIEW" => Some(Self::Review),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn column_title(&self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

/// Owning context under which task requests are issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Legacy per-user task collection.
    User(String),
    Workspace(String),
}

impl Scope {
    pub fn workspace_id(&self) -> Option<&str> {
        match self {
            Self::Workspace(id) => Some(id),
            Self::User(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    /// Absent on records created before the kanban board existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
}

impl Task {
    /// Status to display: explicit status wins, else derived from `is_completed`.
    pub fn effective_status(&self) -> TaskStatus {
        self.status.unwrap_or(if self.is_completed {
            TaskStatus::Done
        } else {
            TaskStatus::ToDo
        })
    }

    pub fn is_temporary(&self) -> bool {
        self.id.starts_with(TEMP_ID_PREFIX)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskCreateInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskCreateInput {
    pub fn validate(&self) -> Result<(), TaskFlowError> {
        if self.title.trim().is_empty() {
            return Err(TaskFlowError::validation("Title must not be empty"));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(TaskFlowError::validation(format!(
                "Title must be at most {TITLE_MAX_LEN} characters"
            )));
        }
        if let Some(ref d) = self.description {
            if d.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(TaskFlowError::validation(format!(
                    "Description must be at most {DESCRIPTION_MAX_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), TaskFlowError> {
        if let Some(ref t) = self.title {
            if t.trim().is_empty() {
                return Err(TaskFlowError::validation("Title must not be empty"));
            }
            if t.chars().count() > TITLE_MAX_LEN {
                return Err(TaskFlowError::validation(format!(
                    "Title must be at most {TITLE_MAX_LEN} characters"
                )));
            }
        }
        if let Some(ref d) = self.description {
            if d.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(TaskFlowError::validation(format!(
                    "Description must be at most {DESCRIPTION_MAX_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}
