//! Plain-text rendering of tasks and suggestions for the terminal.

use crate::integration::SystemStatus;
use crate::preferences::Theme;
use crate::task::{SuggestionEntry, Task};
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub const EMPTY_STATE: &str = "📝 No tasks yet. Add your first task to get started!";

const DUE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the whole list, one task per line with its subtasks indented below
pub fn render_task_list(tasks: &[Task], now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return EMPTY_STATE.to_string();
    }

    let mut out = String::new();
    for task in tasks {
        out.push_str(&render_task(task, now));
        for subtask in &task.subtasks {
            let check = if subtask.completed { "x" } else { " " };
            let _ = writeln!(out, "      [{}] {}. {}", check, subtask.id, subtask.text);
        }
    }
    out
}

/// One summary line for a task
pub fn render_task(task: &Task, now: DateTime<Utc>) -> String {
    let check = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{}] #{} {} {}",
        check,
        task.id,
        task.priority.icon(),
        task.text
    );

    if let Some(due) = task.due_date {
        let _ = write!(line, "  (due {})", due.format(DUE_FORMAT));
        if task.is_overdue(now) {
            line.push_str(" ⚠️ overdue");
        }
    }

    let (done, total) = task.subtask_progress();
    if total > 0 {
        let _ = write!(line, "  📋 {}/{}", done, total);
    }

    line.push('\n');
    line
}

/// Render a suggestion report. Entries whose task was since deleted are shown by id only.
pub fn render_suggestions(entries: &[SuggestionEntry], tasks: &[Task]) -> String {
    if entries.is_empty() {
        return "No suggestions.".to_string();
    }

    let mut out = String::from("🧠 Suggestions Applied\n");
    out.push_str("Your tasks have been reordered and enhanced with smart subtasks!\n\n");

    for entry in entries {
        let name = tasks
            .iter()
            .find(|task| task.id == entry.task_id)
            .map(|task| task.text.as_str())
            .unwrap_or("(deleted task)");
        let _ = writeln!(
            out,
            "{} {}  #{} {}",
            entry.priority.icon(),
            entry.priority.label(),
            entry.task_id,
            name
        );
        if !entry.suggested_subtasks.is_empty() {
            out.push_str("   Suggested Subtasks:\n");
            for subtask in &entry.suggested_subtasks {
                let _ = writeln!(out, "     - {}", subtask.text);
            }
        }
    }

    out.push_str(
        "\n💡 Tip: edit any task, or run `suggestions adopt <id>` to add its suggested subtasks.\n",
    );
    out
}

pub fn render_theme(theme: Theme) -> String {
    format!("{} Theme: {}", theme.icon(), theme)
}

pub fn render_status(status: &SystemStatus) -> String {
    format!(
        "📊 {} task(s), {} completed, {} overdue{} | {}",
        status.total_tasks,
        status.completed_tasks,
        status.overdue_tasks,
        if status.has_suggestions {
            ", suggestions active"
        } else {
            ""
        },
        render_theme(status.theme)
    )
}
