//! CLI-specific functionality for the smart to-do planner
//!
//! This module contains all CLI-related code including argument parsing,
//! command execution, terminal rendering, and configuration discovery.

pub mod args;
pub mod commands;
pub mod config;
pub mod display;

pub use args::{
    Args, ExecutionMode, PlannerCommand, ReplCommand, ReplLine, SubtaskCommand,
    SuggestionsCommand,
};
pub use commands::execute;
pub use config::ConfigDiscovery;
