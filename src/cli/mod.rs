pub mod auth;
pub mod board;
pub mod commands;
pub mod stats;
pub mod task;
pub mod workspace;

use crate::api::{ApiClient, HttpTaskGateway};
use crate::error::TaskFlowError;
use crate::manager::TaskManager;
use crate::models::{Scope, Task, TaskStatus};
use crate::output;
use crate::store::{SessionStore, StatusCache};

pub(crate) fn report_error(e: &TaskFlowError, json_output: bool) {
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::error(e)).unwrap()
        );
    } else {
        eprintln!("Error: {}", e.message);
    }
}

/// Client for endpoints that work without a stored token (login, signup).
pub(crate) fn anonymous_client() -> Result<ApiClient, TaskFlowError> {
    Ok(ApiClient::new(ApiClient::base_url_from_env()?, None))
}

/// Client carrying the stored bearer token. Fails when not signed in.
pub(crate) fn authed_client(session: &SessionStore) -> Result<ApiClient, TaskFlowError> {
    let creds = session
        .credentials()
        .ok_or_else(TaskFlowError::not_authenticated)?;
    Ok(ApiClient::new(
        ApiClient::base_url_from_env()?,
        Some(creds.access_token),
    ))
}

/// Manager wired to the HTTP gateway, plus the scope task commands operate
/// under: the selected workspace if any, else the personal collection.
pub(crate) fn build_manager(
) -> Result<(TaskManager<HttpTaskGateway>, Scope, SessionStore), TaskFlowError> {
    let session = SessionStore::open_default()?;
    let creds = session
        .credentials()
        .ok_or_else(TaskFlowError::not_authenticated)?;
    let client = ApiClient::new(
        ApiClient::base_url_from_env()?,
        Some(creds.access_token.clone()),
    );
    let gateway = HttpTaskGateway::new(client, Some(creds.user.id.clone()));
    let manager = TaskManager::new(gateway, StatusCache::open_default()?);
    let scope = match session.current_workspace() {
        Some(ws) => Scope::Workspace(ws),
        None => Scope::User(creds.user.id),
    };
    Ok((manager, scope, session))
}

/// Resolve a task reference against the fetched collection: exact id first,
/// then unique id prefix.
pub(crate) fn resolve_task<'a>(
    tasks: &'a [Task],
    reference: &str,
) -> Result<&'a Task, TaskFlowError> {
    if let Some(t) = tasks.iter().find(|t| t.id == reference) {
        return Ok(t);
    }
    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(reference)).collect();
    match matches.len() {
        0 => Err(TaskFlowError::task_not_found_locally(reference)),
        1 => Ok(matches[0]),
        _ => {
            let candidates: Vec<String> = matches
                .iter()
                .map(|t| format!("{} ({})", t.title, t.id))
                .collect();
            Err(TaskFlowError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub(crate) fn parse_status(s: &str) -> Result<TaskStatus, TaskFlowError> {
    TaskStatus::from_str(&s.to_uppercase()).ok_or_else(|| {
        TaskFlowError::validation(format!(
            "Unknown status '{s}'. Expected one of: TO_DO, IN_PROGRESS, REVIEW, DONE"
        ))
    })
}
