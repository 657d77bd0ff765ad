use crate::board::Column;
use crate::models::{AnalyticsResponse, Task, User, Workspace};

fn short_id(id: &str) -> &str {
    &id[..std::cmp::min(8, id.len())]
}

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.title, t.id);
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    println!("  Status: {}", t.effective_status().as_str());
    if let Some(p) = t.priority {
        println!("  Priority: {}", p.as_str());
    }
    println!("  Completed: {}", if t.is_completed { "yes" } else { "no" });
    println!("  Created: {}", t.created_at);
    println!("  Updated: {}", t.updated_at);
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let check = if t.is_completed { "x" } else { " " };
        println!(
            "  [{}] {} ({}) [{}]",
            check,
            t.title,
            short_id(&t.id),
            t.effective_status().as_str()
        );
    }
}

pub fn print_board(columns: &[Column]) {
    for col in columns {
        println!("{} ({})", col.status.column_title(), col.tasks.len());
        for t in &col.tasks {
            println!("  {} ({})", t.title, short_id(&t.id));
        }
        println!();
    }
}

pub fn print_user(u: &User) {
    println!("{} ({})", u.email, u.id);
}

pub fn print_workspace_list(workspaces: &[Workspace], current: Option<&str>) {
    if workspaces.is_empty() {
        println!("No workspaces found.");
        return;
    }
    for w in workspaces {
        let marker = if current == Some(w.id.as_str()) { "*" } else { " " };
        println!("{marker} {} ({})", w.name, w.id);
    }
}

pub fn print_analytics(a: &AnalyticsResponse) {
    println!(
        "Tasks: {} total, {} completed, {} pending ({:.1}%)",
        a.summary.total_tasks,
        a.summary.completed_tasks,
        a.summary.pending_tasks,
        a.summary.completion_rate
    );
    if !a.status_distribution.is_empty() {
        println!("\nBy status:");
        for s in &a.status_distribution {
            println!("  {:<12} {:>4} ({:.1}%)", s.status, s.count, s.percentage);
        }
    }
    if !a.priority_breakdown.is_empty() {
        println!("\nBy priority:");
        for p in &a.priority_breakdown {
            println!(
                "  {:<8} {:>4} ({} completed, {} pending)",
                p.priority, p.count, p.completed, p.pending
            );
        }
    }
    if !a.completion_trend.is_empty() {
        println!("\nTrend:");
        for d in &a.completion_trend {
            println!("  {}  +{} created, {} completed", d.date, d.created, d.completed);
        }
    }
}
