//! End-to-end planner behavior against the file-backed store

use chrono::{DateTime, Duration, TimeZone, Utc};
use smart_todo::env::{self, keys};
use smart_todo::{
    IdStrategy, PlannerError, TaskPriority, Theme, TodoConfig, TodoSystem,
};
use std::fs;
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
}

fn config_for(temp_dir: &TempDir) -> TodoConfig {
    TodoConfig {
        data_dir: Some(temp_dir.path().join("data")),
        ..TodoConfig::default()
    }
}

#[test]
fn test_full_session_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let (overdue, soon, later, undated) = {
        let mut system = TodoSystem::open(&config).unwrap();
        let undated = system.add_task("Clean the kitchen", None, now()).unwrap();
        let later = system
            .add_task("Study for finals", Some(now() + Duration::days(5)), now())
            .unwrap();
        let soon = system
            .add_task("Cook dinner", Some(now() + Duration::hours(4)), now())
            .unwrap();
        let overdue = system
            .add_task("Work expenses", Some(now() - Duration::hours(2)), now())
            .unwrap();

        let entries = system.apply_suggestions(now()).unwrap();
        assert_eq!(entries.len(), 4);
        system.toggle_theme().unwrap();
        (overdue, soon, later, undated)
    };

    let system = TodoSystem::open(&config).unwrap();
    let order: Vec<_> = system.tasks().iter().map(|t| t.id).collect();
    assert_eq!(order, vec![overdue, soon, later, undated]);

    let priorities: Vec<_> = system.tasks().iter().map(|t| t.priority).collect();
    assert_eq!(
        priorities,
        vec![
            TaskPriority::Critical,
            TaskPriority::High,
            TaskPriority::Low,
            TaskPriority::Low
        ]
    );
    assert_eq!(system.suggestions().map(|s| s.len()), Some(4));
    assert_eq!(system.theme(), Theme::Dark);
}

#[test]
fn test_store_files_are_json_under_their_keys() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    let data_dir = config.resolved_data_dir();

    let mut system = TodoSystem::open(&config).unwrap();
    system.add_task("Exercise", None, now()).unwrap();

    let raw = fs::read_to_string(env::value_file_path(&data_dir, keys::TASKS)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["text"], "Exercise");
    assert!(value[0].get("createdAt").is_some());
    assert!(value[0].get("dueDate").is_none());

    system.apply_suggestions(now()).unwrap();
    assert!(env::value_file_path(&data_dir, keys::SUGGESTIONS).exists());
    system.clear_suggestions().unwrap();
    assert!(!env::value_file_path(&data_dir, keys::SUGGESTIONS).exists());
}

#[test]
fn test_corrupt_store_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    let data_dir = config.resolved_data_dir();
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(env::value_file_path(&data_dir, keys::TASKS), "{not json").unwrap();
    fs::write(env::value_file_path(&data_dir, keys::THEME), "\"purple\"").unwrap();

    let mut system = TodoSystem::open(&config).unwrap();
    assert!(system.tasks().is_empty());
    assert_eq!(system.theme(), Theme::Light);

    // The next save replaces the corrupt value
    system.add_task("Start over", None, now()).unwrap();
    let reopened = TodoSystem::open(&config).unwrap();
    assert_eq!(reopened.tasks().len(), 1);
}

#[test]
fn test_unparseable_due_date_loads_as_undated() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    let data_dir = config.resolved_data_dir();
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(
        env::value_file_path(&data_dir, keys::TASKS),
        r#"[{"id":7,"text":"Legacy","completed":false,"priority":"high","subtasks":[],
            "createdAt":"2026-10-01T00:00:00Z","dueDate":"next week"}]"#,
    )
    .unwrap();

    let system = TodoSystem::open(&config).unwrap();
    let task = system.get_task(7).unwrap();
    assert_eq!(task.due_date, None);
    assert_eq!(task.priority, TaskPriority::High);
}

#[test]
fn test_rejected_edits_leave_stored_state_alone() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let mut system = TodoSystem::open(&config).unwrap();
    let task_id = system.add_task("Write report", None, now()).unwrap();

    let err = system.update_task_text(task_id, "  ").unwrap_err();
    assert_eq!(
        err.downcast_ref::<PlannerError>(),
        Some(&PlannerError::ValidationRejected)
    );
    let err = system.toggle_subtask(task_id, 999).unwrap_err();
    assert_eq!(
        err.downcast_ref::<PlannerError>(),
        Some(&PlannerError::SubtaskNotFound {
            task_id,
            subtask_id: 999
        })
    );

    let reopened = TodoSystem::open(&config).unwrap();
    assert_eq!(reopened.get_task(task_id).unwrap().text, "Write report");
}

#[test]
fn test_random_ids_stay_unique_across_restarts() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(&temp_dir);
    config.ids.strategy = IdStrategy::Random;

    for round in 0..3 {
        let mut system = TodoSystem::open(&config).unwrap();
        let task_id = system.add_task(&format!("Task {}", round), None, now()).unwrap();
        system.add_subtask(task_id, "Step").unwrap();
    }

    let system = TodoSystem::open(&config).unwrap();
    let mut ids: Vec<u64> = system
        .tasks()
        .iter()
        .flat_map(|t| std::iter::once(t.id).chain(t.subtasks.iter().map(|s| s.id)))
        .collect();
    let count = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert_eq!(count, 6);
}

#[test]
fn test_overdue_watcher_reports_each_task_once() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    let mut system = TodoSystem::open(&config).unwrap();

    system
        .add_task("Pay rent", Some(now() + Duration::minutes(5)), now())
        .unwrap();
    let done = system
        .add_task("Call mom", Some(now() + Duration::minutes(5)), now())
        .unwrap();
    system.toggle_task(done).unwrap();

    let mut notifications = config.notifications.clone();
    notifications.delivery = smart_todo::notify::NotificationDelivery::Log;
    let mut watcher = system.overdue_watcher(&notifications, now());

    assert!(watcher.check(system.tasks(), now() + Duration::minutes(1)).is_empty());
    let alerts = watcher.check(system.tasks(), now() + Duration::minutes(6));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].text, "Pay rent");
    assert!(watcher.check(system.tasks(), now() + Duration::minutes(7)).is_empty());
}
