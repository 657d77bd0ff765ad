use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::cli::{build_manager, parse_status, report_error, resolve_task};
use crate::error::TaskFlowError;
use crate::models::{TaskCreateInput, TaskPatch};
use crate::output;

pub async fn run(cmd: TaskCommands, json_output: bool) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            title,
            description,
            status,
        } => run_add(title, description, status, json_output).await,
        TaskCommands::List => run_list(json_output).await,
        TaskCommands::Show { id } => run_show(&id, json_output).await,
        TaskCommands::Edit {
            id,
            title,
            description,
            status,
        } => run_edit(&id, title, description, status, json_output).await,
        TaskCommands::Done { id } => run_done(&id, json_output).await,
        TaskCommands::Rm { id } => run_rm(&id, json_output).await,
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, json_output);
            1
        }
    }
}

async fn run_add(
    title: String,
    description: Option<String>,
    status: Option<String>,
    json_output: bool,
) -> Result<i32, TaskFlowError> {
    let (manager, scope, _session) = build_manager()?;
    let status = status.as_deref().map(parse_status).transpose()?;
    let input = TaskCreateInput {
        title,
        description,
        status,
    };
    let task = manager.create(input, Some(scope)).await?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Added task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

async fn run_list(json_output: bool) -> Result<i32, TaskFlowError> {
    let (manager, scope, _session) = build_manager()?;
    let tasks = manager.fetch(&scope).await?;

    // Listing fails open: an empty result plus a recorded error means the
    // fetch failed, not that there are no tasks.
    let fetch_warning = if tasks.is_empty() {
        manager.last_error()
    } else {
        None
    };

    if json_output {
        let mut data = json!({ "tasks": output::json::task_list_json(&tasks) });
        if let Some(ref w) = fetch_warning {
            data["warning"] = json!(w);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(data)).unwrap()
        );
    } else {
        if let Some(ref w) = fetch_warning {
            eprintln!("Warning: task listing failed: {w}");
        }
        output::text::print_task_list(&tasks);
    }
    Ok(0)
}

async fn run_show(reference: &str, json_output: bool) -> Result<i32, TaskFlowError> {
    let (manager, scope, _session) = build_manager()?;
    let tasks = manager.fetch(&scope).await?;
    let task = resolve_task(&tasks, reference)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(task)
            })))
            .unwrap()
        );
    } else {
        output::text::print_task(task);
    }
    Ok(0)
}

async fn run_edit(
    reference: &str,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    json_output: bool,
) -> Result<i32, TaskFlowError> {
    let patch = TaskPatch {
        title,
        description,
        status: status.as_deref().map(parse_status).transpose()?,
    };
    if patch.is_empty() {
        return Err(TaskFlowError::validation(
            "Nothing to change: pass --title, --description, or --status",
        ));
    }

    let (manager, scope, _session) = build_manager()?;
    let tasks = manager.fetch(&scope).await?;
    let task_id = resolve_task(&tasks, reference)?.id.clone();
    let updated = manager.update(&task_id, patch).await?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&updated)
            })))
            .unwrap()
        );
    } else {
        println!("Updated task: {} ({})", updated.title, updated.id);
    }
    Ok(0)
}

async fn run_done(reference: &str, json_output: bool) -> Result<i32, TaskFlowError> {
    let (manager, scope, _session) = build_manager()?;
    let tasks = manager.fetch(&scope).await?;
    let task_id = resolve_task(&tasks, reference)?.id.clone();

    let toggled = manager
        .toggle_complete(&task_id)
        .await?
        .ok_or_else(|| TaskFlowError::task_not_found_locally(reference))?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&toggled)
            })))
            .unwrap()
        );
    } else {
        println!(
            "Task {} → {}",
            toggled.id,
            toggled.effective_status().as_str()
        );
    }
    Ok(0)
}

async fn run_rm(reference: &str, json_output: bool) -> Result<i32, TaskFlowError> {
    let (manager, scope, _session) = build_manager()?;
    let tasks = manager.fetch(&scope).await?;
    let task_id = resolve_task(&tasks, reference)?.id.clone();
    manager.delete(&task_id).await?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "deleted": task_id
            })))
            .unwrap()
        );
    } else {
        println!("Deleted task {task_id}");
    }
    Ok(0)
}
