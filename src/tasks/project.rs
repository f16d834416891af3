//! Pure filter/sort projection and derived statistics. Nothing here touches
//! the store; the same inputs always produce the same output.

use time::OffsetDateTime;

use crate::tasks::types::{SortBy, Status, Task, TaskFilters, TaskStats};

/// Display-ordered view of a task sequence: filter, then a stable sort by
/// the requested key. The input order is the tie-break for equal deadline
/// and created keys; priority ties fall back to creation time ascending so
/// the result is deterministic regardless of input order.
pub fn project(tasks: &[Task], filters: &TaskFilters) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| filters.status.matches(t.status) && filters.priority.matches(t.priority))
        .cloned()
        .collect();

    match filters.sort_by {
        SortBy::Deadline => out.sort_by_key(|t| t.deadline),
        SortBy::Priority => out.sort_by(|a, b| {
            b.priority
                .rank()
                .cmp(&a.priority.rank())
                .then_with(|| a.created_at.cmp(&b.created_at))
        }),
        SortBy::Created => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    out
}

/// A task is overdue when it is incomplete and its deadline date (UTC) is
/// strictly before today's date. Comparing dates rather than instants keeps
/// "due later today" out of the overdue bucket.
pub fn is_overdue(task: &Task, now: OffsetDateTime) -> bool {
    task.status == Status::Incomplete && task.deadline.date() < now.date()
}

pub fn is_due_today(task: &Task, now: OffsetDateTime) -> bool {
    task.deadline.date() == now.date()
}

pub fn stats(tasks: &[Task], now: OffsetDateTime) -> TaskStats {
    let completed = tasks.iter().filter(|t| t.status == Status::Completed).count();
    TaskStats {
        total: tasks.len(),
        completed,
        incomplete: tasks.len() - completed,
        overdue: tasks.iter().filter(|t| is_overdue(t, now)).count(),
    }
}
