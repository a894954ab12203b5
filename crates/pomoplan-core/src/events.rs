use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{PhaseKind, TimerState};

/// Every state change in the timer produces an Event.
/// The CLI prints them; the session tracker persists their side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PhaseStarted {
        phase: PhaseKind,
        duration_secs: u32,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: PhaseKind,
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero or was skipped. Carries the session to
    /// finalize and the task to credit; both are optional.
    PhaseCompleted {
        phase: PhaseKind,
        next_phase: PhaseKind,
        completed_work_phases: u32,
        session_id: Option<String>,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    /// The user manually switched phase; any open session was discarded.
    PhaseSelected {
        phase: PhaseKind,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: PhaseKind,
        remaining_secs: u32,
        total_secs: u32,
        display: String,
        progress: f64,
        completed_work_phases: u32,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
}
