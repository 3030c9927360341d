use crate::task::ids::IdGenerator;
use crate::task::scheduler::{classify, order_tasks};
use crate::task::templates::suggest_subtasks;
use crate::task::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of one suggestion pass
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionReport {
    /// Every input task, reordered
    pub reordered_tasks: Vec<Task>,
    /// One entry per input task, in input order
    pub suggestions: Vec<SuggestionEntry>,
}

/// Reorder `tasks` and derive a suggestion entry for each one.
///
/// Does not mutate the input. Only the generated subtask ids depend on `ids`;
/// everything else is a function of `tasks` and `now`.
pub fn compute_suggestions(
    tasks: &[Task],
    now: DateTime<Utc>,
    ids: &mut dyn IdGenerator,
) -> SuggestionReport {
    let reordered_tasks = order_tasks(tasks, now);

    let suggestions = tasks
        .iter()
        .map(|task| SuggestionEntry {
            task_id: task.id,
            priority: classify(task, now),
            suggested_subtasks: suggest_subtasks(&task.text, ids),
        })
        .collect::<Vec<_>>();

    debug!("Computed suggestions for {} task(s)", suggestions.len());

    SuggestionReport {
        reordered_tasks,
        suggestions,
    }
}

impl SuggestionReport {
    pub fn is_empty(&self) -> bool {
        self.reordered_tasks.is_empty() && self.suggestions.is_empty()
    }

    /// Entry for a given task, if the report covers it
    pub fn entry_for(&self, task_id: TaskId) -> Option<&SuggestionEntry> {
        self.suggestions.iter().find(|entry| entry.task_id == task_id)
    }
}
