//! # Smart Todo
//!
//! A to-do list planner with deterministic priority suggestions, keyword-based
//! subtask templates, and overdue alerts.
//!
//! ## Architecture Overview
//!
//! - **[`task`]**: task records, the priority classifier and ordering, subtask templates and the planner state
//! - **[`store`]**: the key-value persistence port and the repository built on it
//! - **[`notify`]**: overdue detection between checks and alert delivery
//! - **[`integration`]**: the planner wired to its store, id generator and configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use smart_todo::{IdStrategy, MemoryKeyValueStore, TodoSystem};
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut system = TodoSystem::with_store(
//!         Arc::new(MemoryKeyValueStore::new()),
//!         IdStrategy::Sequential,
//!     );
//!
//!     let now = chrono::Utc::now();
//!     system.add_task("Study chapter 4", Some(now + chrono::Duration::hours(6)), now)?;
//!     let entries = system.apply_suggestions(now)?;
//!
//!     assert_eq!(entries.len(), 1);
//!     Ok(())
//! }
//! ```

/// Task records and the pure planning rules.
pub mod task;

/// Key-value persistence.
pub mod store;

/// Overdue alerts.
pub mod notify;

/// User preferences such as the color theme.
pub mod preferences;

/// High-level system integration.
///
/// Loads state at startup, saves after every successful mutation, and
/// exposes configuration.
pub mod integration;

/// Environment constants and path utilities.
///
/// Centralizes all hardcoded paths, directory names and storage keys.
pub mod env;

// CLI module for command-line interface
pub mod cli;

// Re-export main task types
pub use task::{
    IdGenerator, IdStrategy, PlannerError, RandomIdGenerator, SequentialIdGenerator, Subtask,
    SubtaskId, SuggestionEntry, SuggestionReport, Task, TaskId, TaskManager, TaskPriority,
    classify, compute_suggestions, find_newly_overdue, order_tasks,
};

// Re-export storage types
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, TaskRepository};

// Re-export notification types
pub use notify::{NotificationConfig, Notifier, OverdueAlert, OverdueWatcher};

pub use preferences::Theme;

// Re-export integration types
pub use integration::{ConfigError, IdConfig, SystemStatus, TodoConfig, TodoSystem};
