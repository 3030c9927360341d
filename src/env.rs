//! Environment constants and path utilities for smart-todo.
//!
//! This module centralizes all hardcoded paths, directory names and storage
//! keys used throughout the application, making them easier to maintain and modify.

use std::path::{Path, PathBuf};

/// Main application directory name (hidden directory like .git, .vscode)
pub const APP_DIR_NAME: &str = ".smart-todo";

/// Configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name when placed directly in a project directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "smart-todo.toml";

/// Data directory name inside the application directory
pub const DATA_DIR_NAME: &str = "data";

/// Keys used in the key-value store
pub mod keys {
    /// Full task list
    pub const TASKS: &str = "smartTodoTasks";

    /// Last applied suggestion report
    pub const SUGGESTIONS: &str = "smartTodoSuggestions";

    /// Theme preference
    pub const THEME: &str = "smartTodoTheme";
}

/// Extension used for values persisted by the file-backed store
pub const VALUE_FILE_EXTENSION: &str = "json";

/// Build the main application directory path from a base directory
pub fn app_dir_path(base: &Path) -> PathBuf {
    base.join(APP_DIR_NAME)
}

/// Build the default data directory path from a base directory
pub fn data_dir_path(base: &Path) -> PathBuf {
    app_dir_path(base).join(DATA_DIR_NAME)
}

/// Build the file path that holds a single key's value
pub fn value_file_path(data_dir: &Path, key: &str) -> PathBuf {
    data_dir.join(format!("{}.{}", key, VALUE_FILE_EXTENSION))
}

/// Build config directory path in user's home directory
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    app_dir_path(home_dir)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    app_dir_path(current_dir).join(CONFIG_FILE_NAME)
}
