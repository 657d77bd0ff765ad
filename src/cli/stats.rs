use crate::api::analytics;
use crate::cli::{authed_client, report_error};
use crate::error::TaskFlowError;
use crate::output;
use crate::store::SessionStore;

pub async fn run(json_output: bool) -> i32 {
    let result = async {
        let session = SessionStore::open_default()?;
        let Some(workspace_id) = session.current_workspace() else {
            return Err(TaskFlowError::no_workspace());
        };
        let client = authed_client(&session)?;
        let report = analytics::workspace_analytics(&client, &workspace_id).await?;

        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&output::json::success(
                    output::json::analytics_json(&report)
                ))
                .unwrap()
            );
        } else {
            output::text::print_analytics(&report);
        }
        Ok::<i32, TaskFlowError>(0)
    }
    .await;

    match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, json_output);
            1
        }
    }
}
