use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for tasks
pub type TaskId = u64;

/// Unique identifier for subtasks
pub type SubtaskId = u64;

/// A single to-do item with its subtasks
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Display tier. Not authoritative; recomputed when suggestions are applied.
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<DateTime<Utc>>,
}

/// A step nested under a task
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Subtask {
    pub id: SubtaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Priority tiers, most urgent first
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

/// Advisory output of the suggestion feature for one task
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionEntry {
    pub task_id: TaskId,
    pub priority: TaskPriority,
    pub suggested_subtasks: Vec<Subtask>,
}

/// Reasons a planner mutation was dropped. State is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("Text must not be empty")]
    ValidationRejected,

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    #[error("Subtask {subtask_id} not found in task {task_id}")]
    SubtaskNotFound {
        task_id: TaskId,
        subtask_id: SubtaskId,
    },

    #[error("No suggestion available for task {0}")]
    NoSuggestion(TaskId),
}

impl Task {
    /// Create a new incomplete task. Callers validate and trim `text` first.
    pub fn new(id: TaskId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            priority: TaskPriority::default(),
            subtasks: Vec::new(),
            created_at,
            due_date: None,
        }
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Check whether the task is past due and still open at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Number of completed subtasks and total subtasks
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }

    pub fn find_subtask_mut(&mut self, subtask_id: SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == subtask_id)
    }
}

impl Subtask {
    pub fn new(id: SubtaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

impl TaskPriority {
    /// All tiers in urgency order
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Critical,
        TaskPriority::High,
        TaskPriority::Medium,
        TaskPriority::Low,
    ];

    pub fn icon(&self) -> &'static str {
        match self {
            TaskPriority::Critical => "🚨",
            TaskPriority::High => "🔥",
            TaskPriority::Medium | TaskPriority::Low => "⚡",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Critical => "Critical Priority",
            TaskPriority::High => "High Priority",
            TaskPriority::Medium => "Medium Priority",
            TaskPriority::Low => "Low Priority",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskPriority::Critical => "critical",
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        };
        f.write_str(name)
    }
}

/// Normalize user-supplied text. Returns `None` for empty or whitespace-only input.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Accept any JSON value for a due date; anything that is not an RFC 3339 string is no due date.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc)))
}
