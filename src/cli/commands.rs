//! Execution of planner commands against a [`TodoSystem`]
//!
//! One-shot invocations and the interactive prompt both go through
//! [`execute`], so every command behaves the same in either mode.

use super::args::{PlannerCommand, SubtaskCommand, SuggestionsCommand, join_words};
use super::display;
use crate::TodoSystem;
use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Run one command and return the text to show the user
pub fn execute(system: &mut TodoSystem, command: PlannerCommand, now: DateTime<Utc>) -> Result<String> {
    debug!("Executing {:?}", command);

    match command {
        PlannerCommand::Add { text, due } => {
            let task_id = system.add_task(&join_words(&text), due, now)?;
            Ok(format!("✅ Added task #{}", task_id))
        }
        PlannerCommand::List => Ok(display::render_task_list(system.tasks(), now)),
        PlannerCommand::Done { id } => {
            let completed = system.toggle_task(id)?;
            Ok(if completed {
                format!("✅ Task #{} completed", id)
            } else {
                format!("↩️ Task #{} reopened", id)
            })
        }
        PlannerCommand::Edit { id, text } => {
            system.update_task_text(id, &join_words(&text))?;
            Ok(format!("✏️ Task #{} updated", id))
        }
        PlannerCommand::Due { id, date } => {
            system.update_due_date(id, date)?;
            Ok(match date {
                Some(due) => format!("📅 Task #{} due {}", id, due.format("%Y-%m-%d %H:%M")),
                None => format!("📅 Task #{} has no due date", id),
            })
        }
        PlannerCommand::Rm { id } => {
            let removed = system.delete_task(id)?;
            Ok(format!("🗑️ Deleted task #{} \"{}\"", removed.id, removed.text))
        }
        PlannerCommand::Sub(action) => execute_subtask(system, action),
        PlannerCommand::Suggest => {
            if system.tasks().is_empty() {
                bail!("Add some tasks first to get AI suggestions!");
            }
            let entries = system.apply_suggestions(now)?;
            Ok(display::render_suggestions(&entries, system.tasks()))
        }
        PlannerCommand::Suggestions { action } => {
            execute_suggestions(system, action.unwrap_or(SuggestionsCommand::Show))
        }
        PlannerCommand::Theme { toggle } => {
            let theme = if toggle {
                system.toggle_theme()?
            } else {
                system.theme()
            };
            Ok(display::render_theme(theme))
        }
        PlannerCommand::CheckOverdue { since_minutes } => {
            if since_minutes < 0 {
                bail!("--since-minutes must not be negative");
            }
            let since = Duration::try_minutes(since_minutes)
                .and_then(|window| now.checked_sub_signed(window))
                .ok_or_else(|| anyhow!("--since-minutes is too large"))?;
            let overdue = system.newly_overdue(since, now);
            if overdue.is_empty() {
                return Ok(format!(
                    "No tasks became overdue in the last {} minute(s)",
                    since_minutes
                ));
            }

            let mut out = String::new();
            for task in overdue {
                out.push_str("⏰ ");
                out.push_str(&display::render_task(task, now));
            }
            Ok(out)
        }
        PlannerCommand::Status => Ok(display::render_status(&system.status(now))),
    }
}

fn execute_subtask(system: &mut TodoSystem, action: SubtaskCommand) -> Result<String> {
    match action {
        SubtaskCommand::Add { task_id, text } => {
            let subtask_id = system.add_subtask(task_id, &join_words(&text))?;
            Ok(format!("✅ Added subtask {} to task #{}", subtask_id, task_id))
        }
        SubtaskCommand::Done {
            task_id,
            subtask_id,
        } => {
            let completed = system.toggle_subtask(task_id, subtask_id)?;
            let state = if completed { "completed" } else { "reopened" };
            Ok(format!("Subtask {} of task #{} {}", subtask_id, task_id, state))
        }
        SubtaskCommand::Rm {
            task_id,
            subtask_id,
        } => {
            system.delete_subtask(task_id, subtask_id)?;
            Ok(format!("🗑️ Deleted subtask {} from task #{}", subtask_id, task_id))
        }
    }
}

fn execute_suggestions(system: &mut TodoSystem, action: SuggestionsCommand) -> Result<String> {
    match action {
        SuggestionsCommand::Show => Ok(match system.suggestions() {
            Some(entries) => display::render_suggestions(entries, system.tasks()),
            None => "No suggestions yet. Run `suggest` to get some.".to_string(),
        }),
        SuggestionsCommand::Clear => Ok(if system.clear_suggestions()? {
            "Suggestions cleared".to_string()
        } else {
            "No suggestions to clear".to_string()
        }),
        SuggestionsCommand::Adopt { task_id } => {
            let subtask_ids = system.adopt_suggested_subtasks(task_id)?;
            Ok(format!(
                "✅ Added {} suggested subtask(s) to task #{} (ids {:?})",
                subtask_ids.len(),
                task_id,
                subtask_ids
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryKeyValueStore};
    use crate::task::{IdStrategy, PlannerError, TaskPriority};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn system() -> TodoSystem {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        TodoSystem::with_store(store, IdStrategy::Sequential)
    }

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_add_and_list() {
        let mut system = system();
        let output = execute(
            &mut system,
            PlannerCommand::Add {
                text: words("Clean the garage"),
                due: Some(now() + Duration::days(2)),
            },
            now(),
        )
        .unwrap();
        assert_eq!(output, "✅ Added task #1");

        let listing = execute(&mut system, PlannerCommand::List, now()).unwrap();
        assert!(listing.contains("#1 ⚡ Clean the garage  (due 2026-10-21 12:00)"));
    }

    #[test]
    fn test_suggest_refused_on_empty_list() {
        let mut system = system();
        let err = execute(&mut system, PlannerCommand::Suggest, now()).unwrap_err();
        assert!(err.to_string().contains("Add some tasks first"));
        assert!(system.suggestions().is_none());
    }

    #[test]
    fn test_suggest_then_adopt() {
        let mut system = system();
        let task_id = system
            .add_task("Work on report", Some(now() + Duration::hours(3)), now())
            .unwrap();

        let report = execute(&mut system, PlannerCommand::Suggest, now()).unwrap();
        assert!(report.contains("🔥 High Priority"));
        assert!(report.contains("     - Research"));
        assert_eq!(system.get_task(task_id).unwrap().priority, TaskPriority::High);

        let adopted = execute(
            &mut system,
            PlannerCommand::Suggestions {
                action: Some(SuggestionsCommand::Adopt { task_id }),
            },
            now(),
        )
        .unwrap();
        assert!(adopted.starts_with("✅ Added 5 suggested subtask(s) to task #1 (ids ["));
        assert_eq!(system.get_task(task_id).unwrap().subtasks.len(), 5);

        let cleared = execute(
            &mut system,
            PlannerCommand::Suggestions {
                action: Some(SuggestionsCommand::Clear),
            },
            now(),
        )
        .unwrap();
        assert_eq!(cleared, "Suggestions cleared");
        assert!(system.suggestions().is_none());
    }

    #[test]
    fn test_unknown_task_surfaces_planner_error() {
        let mut system = system();
        let err = execute(&mut system, PlannerCommand::Done { id: 42 }, now()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PlannerError>(),
            Some(&PlannerError::TaskNotFound(42))
        );
    }

    #[test]
    fn test_check_overdue_window() {
        let mut system = system();
        system
            .add_task("Just missed", Some(now() - Duration::minutes(10)), now())
            .unwrap();
        system
            .add_task("Long gone", Some(now() - Duration::days(1)), now())
            .unwrap();

        let output = execute(
            &mut system,
            PlannerCommand::CheckOverdue { since_minutes: 30 },
            now(),
        )
        .unwrap();
        assert!(output.contains("Just missed"));
        assert!(!output.contains("Long gone"));

        let quiet = execute(
            &mut system,
            PlannerCommand::CheckOverdue { since_minutes: 1 },
            now(),
        )
        .unwrap();
        assert!(quiet.starts_with("No tasks became overdue"));
    }

    #[test]
    fn test_check_overdue_rejects_windows_past_the_calendar() {
        let mut system = system();
        for since_minutes in [150_000_000_000_000, i64::MAX] {
            let err = execute(
                &mut system,
                PlannerCommand::CheckOverdue { since_minutes },
                now(),
            )
            .unwrap_err();
            assert_eq!(err.to_string(), "--since-minutes is too large");
        }
    }

    #[test]
    fn test_subtasks_and_theme() {
        let mut system = system();
        let task_id = system.add_task("Bake bread", None, now()).unwrap();

        execute(
            &mut system,
            PlannerCommand::Sub(SubtaskCommand::Add {
                task_id,
                text: words("Proof dough"),
            }),
            now(),
        )
        .unwrap();
        let subtask_id = system.get_task(task_id).unwrap().subtasks[0].id;

        let output = execute(
            &mut system,
            PlannerCommand::Sub(SubtaskCommand::Done {
                task_id,
                subtask_id,
            }),
            now(),
        )
        .unwrap();
        assert!(output.ends_with("completed"));

        let theme = execute(&mut system, PlannerCommand::Theme { toggle: true }, now()).unwrap();
        assert_eq!(theme, "🌙 Theme: dark");
    }
}
