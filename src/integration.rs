//! # System Integration
//!
//! Wires the pure planner to its collaborators: the key-value store, the id
//! generator and the overdue notifier.
//!
//! ## Core Components
//!
//! - **[`TodoSystem`]**: loads state at startup and saves after every mutation
//! - **[`TodoConfig`]**: unified configuration for storage, ids and notifications
//! - **[`SystemStatus`]**: counts for the status line
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                  TodoSystem                   │
//! │  ┌─────────────┐ ┌─────────────┐ ┌──────────┐ │
//! │  │    Task     │ │    Task     │ │  Theme   │ │
//! │  │   Manager   │ │ Repository  │ │          │ │
//! │  └─────────────┘ └─────────────┘ └──────────┘ │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use smart_todo::{TodoConfig, TodoSystem};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = TodoConfig::default();
//!     let mut system = TodoSystem::open(&config)?;
//!
//!     let now = chrono::Utc::now();
//!     let task_id = system.add_task("Cook dinner", None, now)?;
//!     system.apply_suggestions(now)?;
//!
//!     println!("Created task {}", task_id);
//!     Ok(())
//! }
//! ```

use crate::env;
use crate::notify::{NotificationConfig, OverdueWatcher};
use crate::preferences::Theme;
use crate::store::{FileKeyValueStore, KeyValueStore, TaskRepository};
use crate::task::{
    IdStrategy, LoggingEventHandler, PlannerError, SubtaskId, SuggestionEntry, Task, TaskId,
    TaskManager,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Default log filter for the binary
pub const DEFAULT_LOG_FILTER: &str = "smart_todo=info";

/// Planner with persistence attached
pub struct TodoSystem {
    manager: TaskManager,
    repository: TaskRepository,
    theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TodoConfig {
    /// Where the key-value store lives; defaults to `~/.smart-todo/data`
    pub data_dir: Option<PathBuf>,
    pub log_filter: String,
    pub notifications: NotificationConfig,
    pub ids: IdConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdConfig {
    pub strategy: IdStrategy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        source: toml::de::Error,
        path: PathBuf,
    },
    #[error("failed to write config {path}: {reason}")]
    Write { reason: String, path: PathBuf },
}

/// Counts shown in the status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub overdue_tasks: usize,
    pub has_suggestions: bool,
    pub theme: Theme,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            notifications: NotificationConfig::default(),
            ids: IdConfig::default(),
        }
    }
}

impl TodoConfig {
    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_error = |reason: String| ConfigError::Write {
            reason,
            path: path.to_path_buf(),
        };
        let content = toml::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| write_error(e.to_string()))
    }

    /// Data directory, falling back to the home directory and then the current one
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }

        let base = std::env::var("HOME")
            .ok()
            .or_else(|| std::env::var("USERPROFILE").ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        env::data_dir_path(&base)
    }
}

impl TodoSystem {
    /// Open the file-backed store named by `config` and load the saved state
    pub fn open(config: &TodoConfig) -> Result<Self> {
        let data_dir = config.resolved_data_dir();
        let store = FileKeyValueStore::open(&data_dir)
            .with_context(|| format!("Failed to open task store at {}", data_dir.display()))?;
        info!("Using task store at {}", data_dir.display());

        Ok(Self::with_store(Arc::new(store), config.ids.strategy))
    }

    /// Build around any key-value store. Missing or corrupt data starts an empty list.
    pub fn with_store(store: Arc<dyn KeyValueStore>, id_strategy: IdStrategy) -> Self {
        let repository = TaskRepository::new(store);
        let tasks = repository.load_tasks().unwrap_or_default();
        let suggestions = repository.load_suggestions();
        let theme = repository.load_theme();

        let ids = id_strategy.build(&tasks);
        let mut manager = TaskManager::with_state(tasks, suggestions, ids);
        manager.add_event_handler(Box::new(LoggingEventHandler));

        Self {
            manager,
            repository,
            theme,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.manager.tasks()
    }

    pub fn suggestions(&self) -> Option<&[SuggestionEntry]> {
        self.manager.suggestions()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn get_task(&self, task_id: TaskId) -> Result<&Task> {
        Ok(self.manager.get_task(task_id)?)
    }

    /// Add a task, optionally with a due date
    pub fn add_task(
        &mut self,
        text: &str,
        due_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<TaskId> {
        self.mutate(|manager| {
            let task_id = manager.add_task(text, now)?;
            if due_date.is_some() {
                manager.update_due_date(task_id, due_date)?;
            }
            Ok(task_id)
        })
    }

    pub fn toggle_task(&mut self, task_id: TaskId) -> Result<bool> {
        self.mutate(|manager| manager.toggle_task(task_id))
    }

    pub fn delete_task(&mut self, task_id: TaskId) -> Result<Task> {
        self.mutate(|manager| manager.delete_task(task_id))
    }

    pub fn update_task_text(&mut self, task_id: TaskId, text: &str) -> Result<()> {
        self.mutate(|manager| manager.update_task_text(task_id, text))
    }

    pub fn update_due_date(
        &mut self,
        task_id: TaskId,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.mutate(|manager| manager.update_due_date(task_id, due_date))
    }

    pub fn add_subtask(&mut self, task_id: TaskId, text: &str) -> Result<SubtaskId> {
        self.mutate(|manager| manager.add_subtask(task_id, text))
    }

    pub fn toggle_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> Result<bool> {
        self.mutate(|manager| manager.toggle_subtask(task_id, subtask_id))
    }

    pub fn delete_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> Result<()> {
        self.mutate(|manager| manager.delete_subtask(task_id, subtask_id).map(|_| ()))
    }

    pub fn adopt_suggested_subtasks(&mut self, task_id: TaskId) -> Result<Vec<SubtaskId>> {
        self.mutate(|manager| manager.adopt_suggested_subtasks(task_id))
    }

    /// Reorder, restamp priorities and keep the report
    pub fn apply_suggestions(&mut self, now: DateTime<Utc>) -> Result<Vec<SuggestionEntry>> {
        self.mutate(|manager| Ok(manager.apply_suggestions(now).to_vec()))
    }

    /// Returns whether a report existed
    pub fn clear_suggestions(&mut self) -> Result<bool> {
        self.mutate(|manager| Ok(manager.clear_suggestions()))
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.repository.save_theme(theme)?;
        self.theme = theme;
        Ok(theme)
    }

    /// Open tasks whose due date fell in `[since, now)`
    pub fn newly_overdue(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> Vec<&Task> {
        self.manager.newly_overdue(since, now)
    }

    /// Watcher that reports tasks going overdue after `now`
    pub fn overdue_watcher(&self, config: &NotificationConfig, now: DateTime<Utc>) -> OverdueWatcher {
        OverdueWatcher::new(config.build_notifier(), now)
    }

    pub fn status(&self, now: DateTime<Utc>) -> SystemStatus {
        let tasks = self.manager.tasks();
        SystemStatus {
            total_tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|t| t.completed).count(),
            overdue_tasks: tasks.iter().filter(|t| t.is_overdue(now)).count(),
            has_suggestions: self.manager.suggestions().is_some(),
            theme: self.theme,
        }
    }

    /// Apply one planner operation and persist if it succeeded.
    ///
    /// A failed save rolls the in-memory state back so memory and store agree.
    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut TaskManager) -> Result<T, PlannerError>,
    ) -> Result<T> {
        let snapshot = self.manager.snapshot();
        let value = op(&mut self.manager).inspect_err(|e| warn!("Operation dropped: {}", e))?;

        if let Err(e) = self.persist() {
            warn!("Rolling back unsaved change: {:#}", e);
            self.manager.restore(snapshot);
            // The tasks key may have been written before the failure
            if let Err(restore_err) = self.persist() {
                warn!("Could not rewrite previous state: {:#}", restore_err);
            }
            return Err(e);
        }
        Ok(value)
    }

    fn persist(&self) -> Result<()> {
        self.repository
            .save_tasks(self.manager.tasks())
            .context("Failed to save tasks")?;
        self.repository
            .save_suggestions(self.manager.suggestions())
            .context("Failed to save suggestions")
    }
}
