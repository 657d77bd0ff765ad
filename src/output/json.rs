use serde_json::{json, Value};

use crate::board::Column;
use crate::error::TaskFlowError;
use crate::models::{AnalyticsResponse, Task, User, Workspace};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskFlowError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_json(t: &Task) -> Value {
    let mut v = json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "status": t.effective_status().as_str(),
        "is_completed": t.is_completed,
        "created_at": t.created_at,
        "updated_at": t.updated_at,
    });
    if let Some(p) = t.priority {
        v["priority"] = json!(p.as_str());
    }
    if let Some(ref ws) = t.workspace_id {
        v["workspace_id"] = json!(ws);
    }
    v
}

pub fn task_list_json(tasks: &[Task]) -> Value {
    json!(tasks.iter().map(task_json).collect::<Vec<_>>())
}

pub fn board_json(columns: &[Column]) -> Value {
    json!(columns
        .iter()
        .map(|c| {
            json!({
                "status": c.status.as_str(),
                "title": c.status.column_title(),
                "tasks": task_list_json(&c.tasks),
            })
        })
        .collect::<Vec<_>>())
}

pub fn user_json(u: &User) -> Value {
    json!({
        "id": u.id,
        "email": u.email,
        "created_at": u.created_at,
    })
}

pub fn workspace_json(w: &Workspace) -> Value {
    json!({
        "id": w.id,
        "name": w.name,
        "description": w.description,
        "created_at": w.created_at,
        "updated_at": w.updated_at,
    })
}

pub fn analytics_json(a: &AnalyticsResponse) -> Value {
    json!({
        "workspace_id": a.workspace_id,
        "summary": {
            "total_tasks": a.summary.total_tasks,
            "completed_tasks": a.summary.completed_tasks,
            "pending_tasks": a.summary.pending_tasks,
            "completion_rate": a.summary.completion_rate,
        },
        "status_distribution": a.status_distribution.iter().map(|s| json!({
            "status": s.status,
            "count": s.count,
            "percentage": s.percentage,
        })).collect::<Vec<_>>(),
        "priority_breakdown": a.priority_breakdown.iter().map(|p| json!({
            "priority": p.priority,
            "count": p.count,
            "completed": p.completed,
            "pending": p.pending,
        })).collect::<Vec<_>>(),
        "completion_trend": a.completion_trend.iter().map(|d| json!({
            "date": d.date,
            "completed": d.completed,
            "created": d.created,
        })).collect::<Vec<_>>(),
        "generated_at": a.generated_at,
    })
}
