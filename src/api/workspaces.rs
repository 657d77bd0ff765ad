use crate::api::client::ApiClient;
use crate::error::TaskFlowError;
use crate::models::{Workspace, WorkspaceCreateInput, WorkspaceUpdateInput};

pub async fn list(client: &ApiClient) -> Result<Vec<Workspace>, TaskFlowError> {
    client.get("/api/workspaces").await
}

pub async fn get(client: &ApiClient, workspace_id: &str) -> Result<Workspace, TaskFlowError> {
    client.get(&format!("/api/workspaces/{workspace_id}")).await
}

pub async fn create(
    client: &ApiClient,
    input: &WorkspaceCreateInput,
) -> Result<Workspace, TaskFlowError> {
    client.post("/api/workspaces", input).await
}

pub async fn update(
    client: &ApiClient,
    workspace_id: &str,
    input: &WorkspaceUpdateInput,
) -> Result<Workspace, TaskFlowError> {
    client
        .put(&format!("/api/workspaces/{workspace_id}"), input)
        .await
}

pub async fn delete(client: &ApiClient, workspace_id: &str) -> Result<(), TaskFlowError> {
    client
        .delete(&format!("/api/workspaces/{workspace_id}"))
        .await
}
