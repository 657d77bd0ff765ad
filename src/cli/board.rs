use serde_json::json;

use crate::board::group_by_status;
use crate::cli::commands::BoardCommands;
use crate::cli::{build_manager, parse_status, report_error, resolve_task};
use crate::error::TaskFlowError;
use crate::output;

pub async fn run(cmd: Option<BoardCommands>, json_output: bool) -> i32 {
    let result = match cmd {
        None | Some(BoardCommands::Show) => run_show(json_output).await,
        Some(BoardCommands::Move { id, status }) => run_move(&id, &status, json_output).await,
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, json_output);
            1
        }
    }
}

async fn run_show(json_output: bool) -> Result<i32, TaskFlowError> {
    let (manager, scope, _session) = build_manager()?;
    let tasks = manager.fetch(&scope).await?;
    let columns = group_by_status(&tasks);

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "columns": output::json::board_json(&columns)
            })))
            .unwrap()
        );
    } else {
        output::text::print_board(&columns);
    }
    Ok(0)
}

async fn run_move(
    reference: &str,
    status: &str,
    json_output: bool,
) -> Result<i32, TaskFlowError> {
    let status = parse_status(status)?;
    let (manager, scope, _session) = build_manager()?;
    if scope.workspace_id().is_none() {
        return Err(TaskFlowError::no_workspace());
    }
    let tasks = manager.fetch(&scope).await?;
    let task_id = resolve_task(&tasks, reference)?.id.clone();
    let moved = manager.update_status(&task_id, status).await?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&moved)
            })))
            .unwrap()
        );
    } else {
        println!(
            "Task {} → {}",
            moved.id,
            moved.effective_status().as_str()
        );
    }
    Ok(0)
}
