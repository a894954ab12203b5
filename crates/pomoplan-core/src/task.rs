//! Task model and its completion invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Estimated work intervals, always at least 1.
    pub estimated_pomodoros: u32,
    pub completed_pomodoros: u32,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        user_id: &str,
        title: String,
        description: Option<String>,
        estimated_pomodoros: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            description,
            estimated_pomodoros: estimated_pomodoros.max(1),
            completed_pomodoros: 0,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Credit one completed work interval.
    ///
    /// Moves the task to `InProgress` until the completed count reaches the
    /// estimate, at which point the status flips to `Completed` and the
    /// completion timestamp is set exactly once. Recording against an
    /// already-completed task is a no-op, so the completed count never
    /// exceeds the estimate.
    pub fn record_completed_pomodoro(&mut self, at: DateTime<Utc>) {
        if self.status == TaskStatus::Completed {
            return;
        }
        self.completed_pomodoros += 1;
        if self.completed_pomodoros >= self.estimated_pomodoros {
            self.status = TaskStatus::Completed;
            if self.completed_at.is_none() {
                self.completed_at = Some(at);
            }
        } else {
            self.status = TaskStatus::InProgress;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_floors_estimate_at_one() {
        let task = Task::new("u1", "t".into(), None, 0);
        assert_eq!(task.estimated_pomodoros, 1);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn first_pomodoro_moves_to_in_progress() {
        let mut task = Task::new("u1", "t".into(), None, 3);
        task.record_completed_pomodoro(Utc::now());
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.completed_pomodoros, 1);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn completion_happens_exactly_when_estimate_is_reached() {
        let mut task = Task::new("u1", "t".into(), None, 2);
        task.record_completed_pomodoro(Utc::now());
        assert_eq!(task.status, TaskStatus::InProgress);
        let when = Utc::now();
        task.record_completed_pomodoro(when);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completed_at, Some(when));
    }

    #[test]
    fn completed_count_never_exceeds_estimate() {
        let mut task = Task::new("u1", "t".into(), None, 2);
        let when = Utc::now();
        for _ in 0..5 {
            task.record_completed_pomodoro(when);
        }
        assert_eq!(task.completed_pomodoros, 2);
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn completion_timestamp_is_set_exactly_once() {
        let mut task = Task::new("u1", "t".into(), None, 1);
        let first = Utc::now();
        task.record_completed_pomodoro(first);
        let later = first + chrono::Duration::hours(1);
        task.record_completed_pomodoro(later);
        assert_eq!(task.completed_at, Some(first));
    }
}
