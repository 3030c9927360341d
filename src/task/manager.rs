use crate::task::ids::IdGenerator;
use crate::task::scheduler::*;
use crate::task::suggestions::*;
use crate::task::types::*;
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

/// Owns the task list and applies every mutation to it.
///
/// The manager never touches storage or the clock: callers pass `now` in and
/// persist [`TaskManager::tasks`] after a successful mutation. A returned
/// [`PlannerError`] always means the list is unchanged.
pub struct TaskManager {
    tasks: Vec<Task>,
    suggestions: Option<Vec<SuggestionEntry>>,
    ids: Box<dyn IdGenerator + Send>,
    event_handlers: Vec<Box<dyn TaskEventHandler + Send + Sync>>,
}

/// Saved copy of the list and the suggestion report
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    tasks: Vec<Task>,
    suggestions: Option<Vec<SuggestionEntry>>,
}

/// Events that can occur during task management
#[derive(Debug, Clone)]
pub enum TaskEvent {
    TaskCreated {
        task_id: TaskId,
    },
    TaskToggled {
        task_id: TaskId,
        completed: bool,
    },
    TaskUpdated {
        task_id: TaskId,
    },
    TaskDeleted {
        task_id: TaskId,
    },
    SubtasksCreated {
        task_id: TaskId,
        subtask_ids: Vec<SubtaskId>,
    },
    SubtaskToggled {
        task_id: TaskId,
        subtask_id: SubtaskId,
        completed: bool,
    },
    SubtaskDeleted {
        task_id: TaskId,
        subtask_id: SubtaskId,
    },
    SuggestionsApplied {
        task_count: usize,
    },
    SuggestionsCleared,
}

/// Handler for task events
pub trait TaskEventHandler {
    fn handle_event(&self, event: &TaskEvent) -> Result<()>;
}

impl TaskManager {
    /// Create an empty task manager
    pub fn new(ids: Box<dyn IdGenerator + Send>) -> Self {
        Self::with_state(Vec::new(), None, ids)
    }

    /// Create a task manager around a previously persisted state
    pub fn with_state(
        tasks: Vec<Task>,
        suggestions: Option<Vec<SuggestionEntry>>,
        ids: Box<dyn IdGenerator + Send>,
    ) -> Self {
        Self {
            tasks,
            suggestions,
            ids,
            event_handlers: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Current suggestion report, if one has been applied and not cleared
    pub fn suggestions(&self) -> Option<&[SuggestionEntry]> {
        self.suggestions.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Copy the current list and report
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            tasks: self.tasks.clone(),
            suggestions: self.suggestions.clone(),
        }
    }

    /// Put back a snapshot. Ids already minted stay used.
    pub fn restore(&mut self, snapshot: TaskSnapshot) {
        self.tasks = snapshot.tasks;
        self.suggestions = snapshot.suggestions;
    }

    /// Get a task by ID
    pub fn get_task(&self, task_id: TaskId) -> Result<&Task, PlannerError> {
        self.tasks
            .iter()
            .find(|task| task.id == task_id)
            .ok_or(PlannerError::TaskNotFound(task_id))
    }

    fn task_mut(&mut self, task_id: TaskId) -> Result<&mut Task, PlannerError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or(PlannerError::TaskNotFound(task_id))
    }

    /// Append a new task
    pub fn add_task(&mut self, text: &str, now: DateTime<Utc>) -> Result<TaskId, PlannerError> {
        let text = normalize_text(text).ok_or(PlannerError::ValidationRejected)?;
        let task_id = self.ids.next_id();

        self.tasks.push(Task::new(task_id, text, now));
        self.emit_event(TaskEvent::TaskCreated { task_id });

        debug!("Created task {}", task_id);
        Ok(task_id)
    }

    /// Flip completion. Returns the new state.
    pub fn toggle_task(&mut self, task_id: TaskId) -> Result<bool, PlannerError> {
        let task = self.task_mut(task_id)?;
        task.completed = !task.completed;
        let completed = task.completed;

        self.emit_event(TaskEvent::TaskToggled { task_id, completed });
        Ok(completed)
    }

    /// Remove a task and return it
    pub fn delete_task(&mut self, task_id: TaskId) -> Result<Task, PlannerError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or(PlannerError::TaskNotFound(task_id))?;
        let removed = self.tasks.remove(index);

        self.emit_event(TaskEvent::TaskDeleted { task_id });
        Ok(removed)
    }

    /// Replace a task's text
    pub fn update_task_text(&mut self, task_id: TaskId, text: &str) -> Result<(), PlannerError> {
        let text = normalize_text(text).ok_or(PlannerError::ValidationRejected)?;
        self.task_mut(task_id)?.text = text;

        self.emit_event(TaskEvent::TaskUpdated { task_id });
        Ok(())
    }

    /// Set or clear a task's due date
    pub fn update_due_date(
        &mut self,
        task_id: TaskId,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<(), PlannerError> {
        self.task_mut(task_id)?.due_date = due_date;

        self.emit_event(TaskEvent::TaskUpdated { task_id });
        Ok(())
    }

    /// Append a subtask to a task
    pub fn add_subtask(&mut self, task_id: TaskId, text: &str) -> Result<SubtaskId, PlannerError> {
        let text = normalize_text(text).ok_or(PlannerError::ValidationRejected)?;
        // Resolve the task before minting an id so a miss leaves the generator untouched
        self.get_task(task_id)?;
        let subtask_id = self.ids.next_id();
        self.task_mut(task_id)?
            .subtasks
            .push(Subtask::new(subtask_id, text));

        self.emit_event(TaskEvent::SubtasksCreated {
            task_id,
            subtask_ids: vec![subtask_id],
        });
        Ok(subtask_id)
    }

    /// Flip a subtask's completion. Returns the new state.
    pub fn toggle_subtask(
        &mut self,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> Result<bool, PlannerError> {
        let subtask = self
            .task_mut(task_id)?
            .find_subtask_mut(subtask_id)
            .ok_or(PlannerError::SubtaskNotFound {
                task_id,
                subtask_id,
            })?;
        subtask.completed = !subtask.completed;
        let completed = subtask.completed;

        self.emit_event(TaskEvent::SubtaskToggled {
            task_id,
            subtask_id,
            completed,
        });
        Ok(completed)
    }

    /// Remove a subtask and return it
    pub fn delete_subtask(
        &mut self,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> Result<Subtask, PlannerError> {
        let task = self.task_mut(task_id)?;
        let index = task
            .subtasks
            .iter()
            .position(|s| s.id == subtask_id)
            .ok_or(PlannerError::SubtaskNotFound {
                task_id,
                subtask_id,
            })?;
        let removed = task.subtasks.remove(index);

        self.emit_event(TaskEvent::SubtaskDeleted {
            task_id,
            subtask_id,
        });
        Ok(removed)
    }

    /// Compute a suggestion report without changing anything
    pub fn preview_suggestions(&mut self, now: DateTime<Utc>) -> SuggestionReport {
        compute_suggestions(&self.tasks, now, self.ids.as_mut())
    }

    /// Reorder the list, refresh each task's display priority, and keep the report.
    pub fn apply_suggestions(&mut self, now: DateTime<Utc>) -> &[SuggestionEntry] {
        let SuggestionReport {
            mut reordered_tasks,
            suggestions,
        } = compute_suggestions(&self.tasks, now, self.ids.as_mut());

        for task in &mut reordered_tasks {
            if let Some(entry) = suggestions.iter().find(|entry| entry.task_id == task.id) {
                task.priority = entry.priority;
            }
        }

        self.tasks = reordered_tasks;
        let task_count = self.tasks.len();
        self.emit_event(TaskEvent::SuggestionsApplied { task_count });

        info!("Applied suggestions to {} task(s)", task_count);
        self.suggestions.insert(suggestions)
    }

    /// Drop the current report. Tasks are untouched. Returns whether a report existed.
    pub fn clear_suggestions(&mut self) -> bool {
        let existed = self.suggestions.take().is_some();
        if existed {
            self.emit_event(TaskEvent::SuggestionsCleared);
        }
        existed
    }

    /// Attach the suggested subtasks for `task_id` from the current report.
    ///
    /// Subtasks get fresh ids so adopting twice never duplicates an id.
    pub fn adopt_suggested_subtasks(
        &mut self,
        task_id: TaskId,
    ) -> Result<Vec<SubtaskId>, PlannerError> {
        self.get_task(task_id)?;
        let texts: Vec<String> = self
            .suggestions
            .as_deref()
            .and_then(|entries| entries.iter().find(|entry| entry.task_id == task_id))
            .map(|entry| {
                entry
                    .suggested_subtasks
                    .iter()
                    .map(|s| s.text.clone())
                    .collect()
            })
            .ok_or(PlannerError::NoSuggestion(task_id))?;

        let adopted: Vec<Subtask> = texts
            .into_iter()
            .map(|text| Subtask::new(self.ids.next_id(), text))
            .collect();
        let subtask_ids: Vec<SubtaskId> = adopted.iter().map(|s| s.id).collect();
        self.task_mut(task_id)?.subtasks.extend(adopted);

        self.emit_event(TaskEvent::SubtasksCreated {
            task_id,
            subtask_ids: subtask_ids.clone(),
        });
        Ok(subtask_ids)
    }

    /// Open tasks that became overdue in `[since, now)`
    pub fn newly_overdue(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> Vec<&Task> {
        find_newly_overdue(&self.tasks, since, now)
    }

    /// Add event handler
    pub fn add_event_handler(&mut self, handler: Box<dyn TaskEventHandler + Send + Sync>) {
        self.event_handlers.push(handler);
    }

    /// Emit task event to all handlers
    fn emit_event(&self, event: TaskEvent) {
        for handler in &self.event_handlers {
            if let Err(e) = handler.handle_event(&event) {
                error!("Event handler error: {}", e);
            }
        }
    }
}

/// Simple event handler that logs events
pub struct LoggingEventHandler;

impl TaskEventHandler for LoggingEventHandler {
    fn handle_event(&self, event: &TaskEvent) -> Result<()> {
        match event {
            TaskEvent::TaskCreated { task_id } => {
                info!("Task created: {}", task_id);
            }
            TaskEvent::TaskToggled { task_id, completed } => {
                info!("Task {} completed: {}", task_id, completed);
            }
            TaskEvent::TaskUpdated { task_id } => {
                debug!("Task updated: {}", task_id);
            }
            TaskEvent::TaskDeleted { task_id } => {
                info!("Task deleted: {}", task_id);
            }
            TaskEvent::SubtasksCreated {
                task_id,
                subtask_ids,
            } => {
                info!(
                    "Subtasks created for {}: {} subtasks",
                    task_id,
                    subtask_ids.len()
                );
            }
            TaskEvent::SubtaskToggled {
                task_id,
                subtask_id,
                completed,
            } => {
                debug!(
                    "Subtask {} of task {} completed: {}",
                    subtask_id, task_id, completed
                );
            }
            TaskEvent::SubtaskDeleted {
                task_id,
                subtask_id,
            } => {
                debug!("Subtask {} removed from task {}", subtask_id, task_id);
            }
            TaskEvent::SuggestionsApplied { task_count } => {
                debug!("Suggestions applied over {} tasks", task_count);
            }
            TaskEvent::SuggestionsCleared => {
                debug!("Suggestions cleared");
            }
        }
        Ok(())
    }
}
