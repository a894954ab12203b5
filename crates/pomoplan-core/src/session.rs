//! Session model: one persisted record of a single timer run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One timer run, opened when a work phase starts and finalized when the
/// phase completes. Sessions skipped via a manual phase change stay open
/// and incomplete; analytics must tolerate such entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub task_id: Option<String>,
    /// Planned duration in seconds at the time the session was opened.
    pub duration_secs: u32,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(user_id: &str, task_id: Option<&str>, duration_secs: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            task_id: task_id.map(str::to_string),
            duration_secs,
            completed: false,
            started_at: Utc::now(),
            ended_at: None,
        }
    }
}
