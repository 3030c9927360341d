//! Command line argument parsing
//!
//! Planner subcommands (`add`, `list`, `done`, `suggest`, ...) are shared
//! between one-shot invocations and the interactive prompt, which parses each
//! input line with the same definitions.

use crate::task::{SubtaskId, TaskId};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExecutionMode {
    Command(PlannerCommand),
    Interactive,
    ShowConfig,
    InitConfig,
}

#[derive(Debug, Parser)]
#[command(name = "smart-todo")]
#[command(author = "Smart Todo Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A to-do list with deterministic priority suggestions and overdue alerts")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
    /// Data directory override
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Planner(PlannerCommand),
    /// Run an interactive prompt with periodic overdue checks
    Interactive,
    /// Show configuration discovery information
    ShowConfig,
    /// Write a default configuration file to the home directory
    InitConfig,
}

/// Operations on the task list
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum PlannerCommand {
    /// Add a task
    Add {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Due date (RFC 3339, "YYYY-MM-DD HH:MM", "YYYY-MM-DD", or +30m/+2h/+3d)
        #[arg(long = "due", value_parser = parse_due_date)]
        due: Option<DateTime<Utc>>,
    },
    /// List tasks
    #[command(alias = "ls")]
    List,
    /// Toggle a task's completion
    Done { id: TaskId },
    /// Replace a task's text
    Edit {
        id: TaskId,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Set a task's due date, or clear it when no date is given
    Due {
        id: TaskId,
        #[arg(value_parser = parse_due_date)]
        date: Option<DateTime<Utc>>,
    },
    /// Delete a task
    #[command(alias = "delete")]
    Rm { id: TaskId },
    /// Manage subtasks
    #[command(subcommand)]
    Sub(SubtaskCommand),
    /// Reorder tasks and suggest priorities and subtasks
    Suggest,
    /// Show, clear or adopt the current suggestions
    Suggestions {
        #[command(subcommand)]
        action: Option<SuggestionsCommand>,
    },
    /// Show or toggle the theme
    Theme {
        #[arg(long)]
        toggle: bool,
    },
    /// Report tasks that became overdue in the last N minutes
    CheckOverdue {
        #[arg(long = "since-minutes", default_value_t = 60)]
        since_minutes: i64,
    },
    /// Show task counts
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SubtaskCommand {
    /// Add a subtask to a task
    Add {
        task_id: TaskId,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Toggle a subtask's completion
    Done {
        task_id: TaskId,
        subtask_id: SubtaskId,
    },
    /// Delete a subtask
    #[command(alias = "delete")]
    Rm {
        task_id: TaskId,
        subtask_id: SubtaskId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SuggestionsCommand {
    /// Show the current suggestions
    Show,
    /// Discard the current suggestions
    Clear,
    /// Attach a task's suggested subtasks to it
    Adopt { task_id: TaskId },
}

/// One line typed at the interactive prompt
#[derive(Debug, Parser)]
#[command(name = "smart-todo", no_binary_name = true, disable_version_flag = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReplCommand {
    #[command(flatten)]
    Planner(PlannerCommand),
    /// Leave the interactive prompt
    #[command(alias = "exit")]
    Quit,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        match &self.command {
            Some(Commands::Planner(command)) => Ok(ExecutionMode::Command(command.clone())),
            Some(Commands::Interactive) => Ok(ExecutionMode::Interactive),
            Some(Commands::ShowConfig) => Ok(ExecutionMode::ShowConfig),
            Some(Commands::InitConfig) => Ok(ExecutionMode::InitConfig),
            None => Err(
                "No command specified. Use 'smart-todo --help' to see available commands."
                    .to_string(),
            ),
        }
    }
}

impl ReplLine {
    /// Parse a prompt line. Clap's rendered error (including help output) is returned as text.
    pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
        Self::try_parse_from(line.split_whitespace())
            .map(|parsed| parsed.command)
            .map_err(|e| e.render().to_string())
    }
}

/// Join free-text words captured as separate arguments
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}

/// Parse a due date relative to the current wall clock
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, String> {
    parse_due_date_at(input, Utc::now())
}

/// Parse a due date.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM` (UTC),
/// `YYYY-MM-DD` (midnight UTC), or an offset from `now` such as `+45m`, `+2h`, `+3d`.
pub fn parse_due_date_at(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let input = input.trim();

    if let Some(offset) = input.strip_prefix('+') {
        return parse_offset(offset)
            .and_then(|duration| now.checked_add_signed(duration))
            .ok_or_else(|| format!("Invalid relative due date '{}'", input));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Unrecognized due date '{}'", input))
}

fn parse_offset(offset: &str) -> Option<Duration> {
    let unit = offset.chars().last()?;
    let amount: i64 = offset[..offset.len() - unit.len_utf8()].parse().ok()?;
    if amount < 0 {
        return None;
    }

    match unit {
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_add_command_with_due_date() {
        let args = Args::try_parse_from([
            "smart-todo",
            "add",
            "Buy",
            "groceries",
            "--due",
            "2026-10-20 18:30",
        ])
        .unwrap();

        match args.mode().unwrap() {
            ExecutionMode::Command(PlannerCommand::Add { text, due }) => {
                assert_eq!(join_words(&text), "Buy groceries");
                assert_eq!(due, Some(Utc.with_ymd_and_hms(2026, 10, 20, 18, 30, 0).unwrap()));
            }
            other => panic!("Expected Add command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_options() {
        let args =
            Args::try_parse_from(["smart-todo", "list", "--data-dir", "/tmp/todo"]).unwrap();
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/todo")));
        assert!(matches!(
            args.mode().unwrap(),
            ExecutionMode::Command(PlannerCommand::List)
        ));
    }

    #[test]
    fn test_due_without_date_clears() {
        let args = Args::try_parse_from(["smart-todo", "due", "4"]).unwrap();
        assert!(matches!(
            args.mode().unwrap(),
            ExecutionMode::Command(PlannerCommand::Due { id: 4, date: None })
        ));
    }

    #[test]
    fn test_nested_subcommands() {
        let args = Args::try_parse_from(["smart-todo", "sub", "done", "1", "2"]).unwrap();
        assert!(matches!(
            args.mode().unwrap(),
            ExecutionMode::Command(PlannerCommand::Sub(SubtaskCommand::Done {
                task_id: 1,
                subtask_id: 2
            }))
        ));

        let args = Args::try_parse_from(["smart-todo", "suggestions", "adopt", "3"]).unwrap();
        assert!(matches!(
            args.mode().unwrap(),
            ExecutionMode::Command(PlannerCommand::Suggestions {
                action: Some(SuggestionsCommand::Adopt { task_id: 3 })
            })
        ));
    }

    #[test]
    fn test_interactive_and_config_modes() {
        let args = Args::try_parse_from(["smart-todo", "interactive"]).unwrap();
        assert!(matches!(args.mode().unwrap(), ExecutionMode::Interactive));

        let args = Args::try_parse_from(["smart-todo", "show-config"]).unwrap();
        assert!(matches!(args.mode().unwrap(), ExecutionMode::ShowConfig));
    }

    #[test]
    fn test_no_command_error() {
        let args = Args {
            config: None,
            data_dir: None,
            command: None,
        };
        assert!(args.mode().is_err());
    }

    #[test]
    fn test_repl_line_parsing() {
        assert!(matches!(
            ReplLine::parse_line("add walk the dog").unwrap(),
            ReplCommand::Planner(PlannerCommand::Add { .. })
        ));
        assert!(matches!(ReplLine::parse_line("exit").unwrap(), ReplCommand::Quit));
        assert!(ReplLine::parse_line("frobnicate").is_err());
    }

    #[test]
    fn test_due_date_formats() {
        let now = fixed_now();
        let expected = Utc.with_ymd_and_hms(2026, 10, 21, 9, 15, 0).unwrap();

        assert_eq!(parse_due_date_at("2026-10-21T09:15:00Z", now), Ok(expected));
        assert_eq!(parse_due_date_at("2026-10-21T11:15:00+02:00", now), Ok(expected));
        assert_eq!(parse_due_date_at("2026-10-21 09:15", now), Ok(expected));
        assert_eq!(parse_due_date_at("2026-10-21T09:15", now), Ok(expected));
        assert_eq!(
            parse_due_date_at("2026-10-21", now),
            Ok(Utc.with_ymd_and_hms(2026, 10, 21, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_relative_due_dates() {
        let now = fixed_now();
        assert_eq!(parse_due_date_at("+30m", now), Ok(now + Duration::minutes(30)));
        assert_eq!(parse_due_date_at("+2h", now), Ok(now + Duration::hours(2)));
        assert_eq!(parse_due_date_at("+3d", now), Ok(now + Duration::days(3)));
        assert!(parse_due_date_at("+3w", now).is_err());
        assert!(parse_due_date_at("+", now).is_err());
        assert!(parse_due_date_at("next tuesday", now).is_err());
    }

    #[test]
    fn test_relative_due_date_out_of_range() {
        let now = fixed_now();
        assert_eq!(
            parse_due_date_at("+100000000000d", now),
            Err("Invalid relative due date '+100000000000d'".to_string())
        );
        assert!(Args::try_parse_from(["smart-todo", "due", "1", "+100000000000d"]).is_err());
    }
}
