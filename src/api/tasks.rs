use async_trait::async_trait;
use tracing::debug;

use crate::api::client::ApiClient;
use crate::error::TaskFlowError;
use crate::models::{Scope, Task, TaskCreateInput, TaskPatch, TaskStatus};

/// Remote task collection, scoped by workspace or user identity.
///
/// The trait is the seam between the optimistic mutation manager and the
/// network; the manager decides rollback/reconciliation, implementations only
/// translate intents into requests and normalize failures.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn list(&self, scope: &Scope) -> Result<Vec<Task>, TaskFlowError>;

    async fn create(&self, input: &TaskCreateInput, scope: &Scope) -> Result<Task, TaskFlowError>;

    async fn update(&self, task_id: &str, patch: &TaskPatch) -> Result<Task, TaskFlowError>;

    async fn delete(&self, task_id: &str) -> Result<(), TaskFlowError>;

    async fn toggle_complete(&self, task_id: &str) -> Result<Task, TaskFlowError>;

    /// Kanban drag-drop status change. Workspace scope only.
    async fn update_status(
        &self,
        scope: &Scope,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Task, TaskFlowError>;
}

/// Gateway over the TaskFlow REST API.
///
/// Single-task operations (`update`, `delete`, `toggle_complete`) go through
/// the legacy per-user routes and therefore need the signed-in user id.
pub struct HttpTaskGateway {
    client: ApiClient,
    user_id: Option<String>,
}

impl HttpTaskGateway {
    pub fn new(client: ApiClient, user_id: Option<String>) -> Self {
        Self { client, user_id }
    }

    fn user_id(&self) -> Result<&str, TaskFlowError> {
        self.user_id
            .as_deref()
            .ok_or_else(TaskFlowError::not_authenticated)
    }

    fn list_path(scope: &Scope) -> String {
        match scope {
            Scope::Workspace(id) => format!("/api/workspaces/{id}/tasks"),
            Scope::User(id) => format!("/api/{id}/tasks"),
        }
    }
}

#[derive(serde::Serialize)]
struct StatusBody {
    status: TaskStatus,
}

#[async_trait]
impl TaskGateway for HttpTaskGateway {
    async fn list(&self, scope: &Scope) -> Result<Vec<Task>, TaskFlowError> {
        let tasks: Vec<Task> = self.client.get(&Self::list_path(scope)).await?;
        debug!(count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    async fn create(&self, input: &TaskCreateInput, scope: &Scope) -> Result<Task, TaskFlowError> {
        self.client.post(&Self::list_path(scope), input).await
    }

    async fn update(&self, task_id: &str, patch: &TaskPatch) -> Result<Task, TaskFlowError> {
        let user_id = self.user_id()?;
        self.client
            .put(&format!("/api/{user_id}/tasks/{task_id}"), patch)
            .await
    }

    async fn delete(&self, task_id: &str) -> Result<(), TaskFlowError> {
        let user_id = self.user_id()?;
        self.client
            .delete(&format!("/api/{user_id}/tasks/{task_id}"))
            .await
    }

    async fn toggle_complete(&self, task_id: &str) -> Result<Task, TaskFlowError> {
        let user_id = self.user_id()?;
        self.client
            .patch::<(), Task>(&format!("/api/{user_id}/tasks/{task_id}/complete"), None)
            .await
    }

    async fn update_status(
        &self,
        scope: &Scope,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Task, TaskFlowError> {
        let workspace_id = scope
            .workspace_id()
            .ok_or_else(TaskFlowError::no_workspace)?;
        self.client
            .patch(
                &format!("/api/workspaces/{workspace_id}/tasks/{task_id}/status"),
                Some(&StatusBody { status }),
            )
            .await
    }
}
