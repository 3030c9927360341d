use crate::task::types::*;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::debug;

/// Nanoseconds in one day, used for the ceiling day difference
pub const NANOS_PER_DAY: u64 = 86_400_000_000_000;

/// Tasks due within this many days are `High`
pub const HIGH_PRIORITY_DAYS: u64 = 1;

/// Tasks due within this many days are `Medium`
pub const MEDIUM_PRIORITY_DAYS: u64 = 3;

/// Assign a priority tier from completion state and due date.
///
/// Rules are evaluated in order and the first match wins:
/// completed or undated tasks are `Low`, overdue tasks are `Critical`,
/// and otherwise the ceiling of the remaining days picks `High` (≤ 1),
/// `Medium` (≤ 3) or `Low`. A task due exactly at `now` is not overdue
/// and lands in `High`.
pub fn classify(task: &Task, now: DateTime<Utc>) -> TaskPriority {
    if task.completed {
        return TaskPriority::Low;
    }

    let Some(due) = task.due_date else {
        return TaskPriority::Low;
    };

    if due < now {
        return TaskPriority::Critical;
    }

    // Spans past the i64 nanosecond range are centuries away
    let Some(remaining_ns) = due.signed_duration_since(now).num_nanoseconds() else {
        return TaskPriority::Low;
    };
    let days = (remaining_ns.max(0) as u64).div_ceil(NANOS_PER_DAY);

    if days <= HIGH_PRIORITY_DAYS {
        TaskPriority::High
    } else if days <= MEDIUM_PRIORITY_DAYS {
        TaskPriority::Medium
    } else {
        TaskPriority::Low
    }
}

/// Total order used when suggestions reorder the list.
///
/// Overdue open tasks first, then open before completed, then dated tasks by
/// ascending due date (dated before undated), then oldest first.
pub fn compare_tasks(a: &Task, b: &Task, now: DateTime<Utc>) -> Ordering {
    let a_overdue = a.is_overdue(now);
    let b_overdue = b.is_overdue(now);

    b_overdue
        .cmp(&a_overdue)
        .then_with(|| a.completed.cmp(&b.completed))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Return a reordered copy of `tasks`. The sort is stable, so full ties keep input order.
pub fn order_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let mut ordered = tasks.to_vec();
    ordered.sort_by(|a, b| compare_tasks(a, b, now));
    ordered
}

/// Open tasks whose due date passed in the window `[since, now)`, in list order.
///
/// Consecutive calls with `since` set to the previous `now` report each task once.
pub fn find_newly_overdue(tasks: &[Task], since: DateTime<Utc>, now: DateTime<Utc>) -> Vec<&Task> {
    let overdue: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.completed)
        .filter(|task| task.due_date.is_some_and(|due| since <= due && due < now))
        .collect();

    if !overdue.is_empty() {
        debug!(
            "{} task(s) became overdue between {} and {}",
            overdue.len(),
            since,
            now
        );
    }

    overdue
}
