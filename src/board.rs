use crate::models::{Task, TaskStatus};

/// One kanban column: a status and the tasks currently in it.
#[derive(Debug, Clone)]
pub struct Column {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

/// Group tasks into the four kanban columns, in board order.
///
/// Tasks without an explicit status fall back to their derived status, so
/// records predating the board still land in a column.
pub fn group_by_status(tasks: &[Task]) -> Vec<Column> {
    let mut columns: Vec<Column> = TaskStatus::ALL
        .iter()
        .map(|&status| Column {
            status,
            tasks: Vec::new(),
        })
        .collect();

    for t in tasks {
        let status = t.effective_status();
        if let Some(col) = columns.iter_mut().find(|c| c.status == status) {
            col.tasks.push(t.clone());
        }
    }

    columns
}
