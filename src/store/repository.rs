use crate::env::keys;
use crate::preferences::Theme;
use crate::store::kv::KeyValueStore;
use crate::task::{SuggestionEntry, Task};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Typed access to the planner's persisted records.
///
/// Loads never fail: unreadable or corrupt values are logged and reported as absent.
#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn KeyValueStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Previously saved task list, or `None` if nothing usable is stored
    pub fn load_tasks(&self) -> Option<Vec<Task>> {
        let tasks: Vec<Task> = self.load_value(keys::TASKS)?;

        if let Some(problem) = validate_tasks(&tasks) {
            warn!("Ignoring stored tasks: {}", problem);
            return None;
        }

        info!("Loaded {} task(s)", tasks.len());
        Some(tasks)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks).context("Failed to serialize tasks")?;
        self.store.set(keys::TASKS, &json)?;
        debug!("Saved {} task(s)", tasks.len());
        Ok(())
    }

    pub fn load_suggestions(&self) -> Option<Vec<SuggestionEntry>> {
        self.load_value(keys::SUGGESTIONS)
    }

    /// Persist the current report, or remove it when `None`
    pub fn save_suggestions(&self, suggestions: Option<&[SuggestionEntry]>) -> Result<()> {
        match suggestions {
            Some(entries) => {
                let json =
                    serde_json::to_string(entries).context("Failed to serialize suggestions")?;
                self.store.set(keys::SUGGESTIONS, &json)
            }
            None => self.store.remove(keys::SUGGESTIONS),
        }
    }

    pub fn load_theme(&self) -> Theme {
        self.load_value(keys::THEME).unwrap_or_default()
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        let json = serde_json::to_string(&theme).context("Failed to serialize theme")?;
        self.store.set(keys::THEME, &json)
    }

    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {}: {:#}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Error loading {} from storage: {}", key, e);
                None
            }
        }
    }
}

/// Describe the first broken invariant in a stored list, if any
fn validate_tasks(tasks: &[Task]) -> Option<String> {
    let mut task_ids = HashSet::new();

    for task in tasks {
        if !task_ids.insert(task.id) {
            return Some(format!("duplicate task id {}", task.id));
        }
        if task.text.trim().is_empty() {
            return Some(format!("task {} has empty text", task.id));
        }

        let mut subtask_ids = HashSet::new();
        for subtask in &task.subtasks {
            if !subtask_ids.insert(subtask.id) {
                return Some(format!(
                    "duplicate subtask id {} in task {}",
                    subtask.id, task.id
                ));
            }
            if subtask.text.trim().is_empty() {
                return Some(format!(
                    "subtask {} of task {} has empty text",
                    subtask.id, task.id
                ));
            }
        }
    }

    None
}
