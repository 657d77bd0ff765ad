use serde_json::json;

use crate::api::workspaces;
use crate::cli::commands::WorkspaceCommands;
use crate::cli::{authed_client, report_error};
use crate::error::TaskFlowError;
use crate::models::{WorkspaceCreateInput, WorkspaceUpdateInput};
use crate::output;
use crate::store::SessionStore;

pub async fn run(cmd: WorkspaceCommands, json_output: bool) -> i32 {
    let result = match cmd {
        WorkspaceCommands::List => run_list(json_output).await,
        WorkspaceCommands::Create { name } => run_create(name, json_output).await,
        WorkspaceCommands::Switch { id } => run_switch(&id, json_output).await,
        WorkspaceCommands::Current => run_current(json_output).await,
        WorkspaceCommands::Rename { id, name } => run_rename(&id, name, json_output).await,
        WorkspaceCommands::Delete { id } => run_delete(&id, json_output).await,
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, json_output);
            1
        }
    }
}

async fn run_list(json_output: bool) -> Result<i32, TaskFlowError> {
    let session = SessionStore::open_default()?;
    let client = authed_client(&session)?;
    let list = workspaces::list(&client).await?;
    let current = session.current_workspace();

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "workspaces": list.iter().map(output::json::workspace_json).collect::<Vec<_>>(),
                "current": current,
            })))
            .unwrap()
        );
    } else {
        output::text::print_workspace_list(&list, current.as_deref());
    }
    Ok(0)
}

async fn run_create(name: String, json_output: bool) -> Result<i32, TaskFlowError> {
    let session = SessionStore::open_default()?;
    let client = authed_client(&session)?;
    let workspace = workspaces::create(&client, &WorkspaceCreateInput { name }).await?;
    // A freshly created workspace becomes the selection.
    session.set_current_workspace(&workspace.id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "workspace": output::json::workspace_json(&workspace)
            })))
            .unwrap()
        );
    } else {
        println!("Created workspace: {} ({})", workspace.name, workspace.id);
    }
    Ok(0)
}

async fn run_switch(reference: &str, json_output: bool) -> Result<i32, TaskFlowError> {
    let session = SessionStore::open_default()?;
    let client = authed_client(&session)?;
    let list = workspaces::list(&client).await?;
    let workspace = list
        .iter()
        .find(|w| w.id == reference || w.name == reference)
        .ok_or_else(|| TaskFlowError::not_found(reference))?;
    session.set_current_workspace(&workspace.id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "workspace": output::json::workspace_json(workspace)
            })))
            .unwrap()
        );
    } else {
        println!("Switched to workspace: {} ({})", workspace.name, workspace.id);
    }
    Ok(0)
}

async fn run_current(json_output: bool) -> Result<i32, TaskFlowError> {
    let session = SessionStore::open_default()?;
    let Some(id) = session.current_workspace() else {
        return Err(TaskFlowError::no_workspace());
    };
    let client = authed_client(&session)?;
    let workspace = workspaces::get(&client, &id).await?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "workspace": output::json::workspace_json(&workspace)
            })))
            .unwrap()
        );
    } else {
        println!("{} ({})", workspace.name, workspace.id);
    }
    Ok(0)
}

async fn run_rename(id: &str, name: String, json_output: bool) -> Result<i32, TaskFlowError> {
    let session = SessionStore::open_default()?;
    let client = authed_client(&session)?;
    let workspace =
        workspaces::update(&client, id, &WorkspaceUpdateInput { name: Some(name) }).await?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "workspace": output::json::workspace_json(&workspace)
            })))
            .unwrap()
        );
    } else {
        println!("Renamed workspace {} to {}", workspace.id, workspace.name);
    }
    Ok(0)
}

async fn run_delete(id: &str, json_output: bool) -> Result<i32, TaskFlowError> {
    let session = SessionStore::open_default()?;
    let client = authed_client(&session)?;
    workspaces::delete(&client, id).await?;
    // Deleting the selected workspace drops the selection back to the
    // personal collection.
    if session.current_workspace().as_deref() == Some(id) {
        session.clear_current_workspace()?;
    }

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "deleted": id }))).unwrap()
        );
    } else {
        println!("Deleted workspace {id}");
    }
    Ok(0)
}
