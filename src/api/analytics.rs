use crate::api::client::ApiClient;
use crate::error::TaskFlowError;
use crate::models::AnalyticsResponse;

pub async fn workspace_analytics(
    client: &ApiClient,
    workspace_id: &str,
) -> Result<AnalyticsResponse, TaskFlowError> {
    client
        .get(&format!("/api/workspaces/{workspace_id}/analytics"))
        .await
}
