//! Overdue-task alerts.
//!
//! The host owns the schedule: it calls [`OverdueWatcher::check`] on its own
//! timer and the watcher forwards any newly overdue tasks to a [`Notifier`].
//! Delivery is fire-and-forget; a notifier that cannot show anything simply
//! does nothing.

use crate::task::{Task, TaskId, find_newly_overdue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, warn};

/// How often the host checks for overdue tasks, in seconds
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub check_interval_secs: u64,
    pub delivery: NotificationDelivery,
}

/// Where alerts are shown
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationDelivery {
    #[default]
    Terminal,
    Log,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            delivery: NotificationDelivery::default(),
        }
    }
}

impl NotificationConfig {
    pub fn build_notifier(&self) -> Box<dyn Notifier> {
        if !self.enabled {
            return Box::new(NullNotifier);
        }
        match self.delivery {
            NotificationDelivery::Terminal => Box::new(TerminalNotifier),
            NotificationDelivery::Log => Box::new(LogNotifier),
        }
    }

    /// Check interval, never shorter than one second
    pub fn check_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.check_interval_secs.max(1))
    }
}

/// What a notifier is asked to display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueAlert {
    pub task_id: TaskId,
    pub text: String,
    pub due_date: DateTime<Utc>,
}

impl OverdueAlert {
    pub fn from_task(task: &Task) -> Option<Self> {
        Some(Self {
            task_id: task.id,
            text: task.text.clone(),
            due_date: task.due_date?,
        })
    }

    pub fn title(&self) -> &'static str {
        "Task Overdue!"
    }

    pub fn body(&self) -> String {
        format!(
            "\"{}\" was due {}",
            self.text,
            self.due_date.format("%Y-%m-%d %H:%M UTC")
        )
    }
}

/// Platform alert port
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: &OverdueAlert);
}

/// Prints a bell and the alert to the terminal
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, alert: &OverdueAlert) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "\x07⏰ {} {}", alert.title(), alert.body()) {
            debug!("Could not display alert for task {}: {}", alert.task_id, e);
        }
    }
}

/// Emits alerts through the tracing pipeline
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, alert: &OverdueAlert) {
        warn!(task_id = alert.task_id, "{} {}", alert.title(), alert.body());
    }
}

/// Used when notifications are disabled or unsupported
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, alert: &OverdueAlert) {
        debug!("Notifications disabled; dropping alert for task {}", alert.task_id);
    }
}

/// Tracks the last check instant so each task is reported once
pub struct OverdueWatcher {
    last_check: DateTime<Utc>,
    notifier: Box<dyn Notifier>,
}

impl OverdueWatcher {
    /// Start watching from `started_at`. Tasks already overdue before then are not reported.
    pub fn new(notifier: Box<dyn Notifier>, started_at: DateTime<Utc>) -> Self {
        Self {
            last_check: started_at,
            notifier,
        }
    }

    pub fn last_check(&self) -> DateTime<Utc> {
        self.last_check
    }

    /// Notify about tasks that became overdue since the previous check. Returns the alerts sent.
    pub fn check(&mut self, tasks: &[Task], now: DateTime<Utc>) -> Vec<OverdueAlert> {
        if now < self.last_check {
            debug!("Clock moved backwards; skipping overdue check");
            return Vec::new();
        }

        let alerts: Vec<OverdueAlert> = find_newly_overdue(tasks, self.last_check, now)
            .into_iter()
            .filter_map(OverdueAlert::from_task)
            .collect();

        for alert in &alerts {
            self.notifier.notify(alert);
        }

        self.last_check = now;
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::{Arc, Mutex};

    struct RecordingNotifier(Arc<Mutex<Vec<TaskId>>>);

    impl Notifier for RecordingNotifier {
        fn notify(&self, alert: &OverdueAlert) {
            self.0.lock().unwrap().push(alert.task_id);
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_each_task_is_reported_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut watcher = OverdueWatcher::new(Box::new(RecordingNotifier(seen.clone())), start());
        let tasks = vec![
            Task::new(1, "Already late".into(), start() - Duration::days(1))
                .with_due_date(start() - Duration::hours(1)),
            Task::new(2, "Due soon".into(), start()).with_due_date(start() + Duration::seconds(30)),
        ];

        assert!(watcher.check(&tasks, start() + Duration::seconds(10)).is_empty());

        let alerts = watcher.check(&tasks, start() + Duration::minutes(1));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].text, "Due soon");

        assert!(watcher.check(&tasks, start() + Duration::minutes(2)).is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![2]);
        assert_eq!(watcher.last_check(), start() + Duration::minutes(2));
    }

    #[test]
    fn test_clock_going_backwards_is_ignored() {
        let mut watcher = OverdueWatcher::new(Box::new(NullNotifier), start());
        assert!(watcher.check(&[], start() - Duration::minutes(5)).is_empty());
        assert_eq!(watcher.last_check(), start());
    }

    #[test]
    fn test_alert_text() {
        let task = Task::new(3, "File taxes".into(), start()).with_due_date(start());
        let alert = OverdueAlert::from_task(&task).unwrap();
        assert_eq!(alert.title(), "Task Overdue!");
        assert_eq!(alert.body(), "\"File taxes\" was due 2026-10-19 08:00 UTC");

        assert!(OverdueAlert::from_task(&Task::new(4, "Undated".into(), start())).is_none());
    }
}
