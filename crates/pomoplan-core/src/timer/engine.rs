//! Timer engine implementation.
//!
//! The timer engine is a pure state machine over whole seconds. It does not
//! use internal threads or touch storage - the caller drives it by calling
//! `tick()` once per elapsed second and feeds the emitted events to a
//! [`SessionTracker`](crate::tracker::SessionTracker) for persistence.
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Running -> Paused -> Running -> ... -> Ready (phase complete)
//! ```
//!
//! Each phase completion picks the next phase kind: a finished work phase
//! leads to a short break, or a long break every `long_break_cadence`
//! completions; a finished break always leads back to work.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::phase::{PhaseDurations, PhaseKind};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Ready,
    Running,
    Paused,
}

/// Core timer engine.
///
/// Serializable so the CLI can park it in the kv store between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    durations: PhaseDurations,
    state: TimerState,
    phase: PhaseKind,
    /// Remaining time in whole seconds for the current phase.
    remaining_secs: u32,
    /// Work phases completed since the engine was created or reset to zero.
    completed_work_phases: u32,
    /// Open session id, set by the tracker after a work phase starts.
    #[serde(default)]
    session_id: Option<String>,
    /// Task the timer is currently credited against.
    #[serde(default)]
    task_id: Option<String>,
}

impl TimerEngine {
    /// Create a new engine in the `Ready` state on a work phase.
    pub fn new(durations: PhaseDurations) -> Self {
        Self {
            durations,
            state: TimerState::Ready,
            phase: PhaseKind::Work,
            remaining_secs: durations.for_phase(PhaseKind::Work),
            completed_work_phases: 0,
            session_id: None,
            task_id: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> PhaseKind {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.durations.for_phase(self.phase)
    }

    pub fn completed_work_phases(&self) -> u32 {
        self.completed_work_phases
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// Remaining time formatted as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            display: self.format_remaining(),
            progress: self.progress(),
            completed_work_phases: self.completed_work_phases,
            task_id: self.task_id.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Ready or Paused -> Running. No-op while already Running.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Ready | TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::PhaseStarted {
                    phase: self.phase,
                    duration_secs: self.total_secs(),
                    task_id: self.task_id.clone(),
                    at: Utc::now(),
                })
            }
            TimerState::Running => None,
        }
    }

    /// Running -> Paused. Idempotent: pausing anything else is a no-op.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Back to Ready with the full configured duration for the current
    /// phase. An open session stays attached; only `select_phase` discards.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Ready;
        self.remaining_secs = self.total_secs();
        Some(Event::TimerReset {
            phase: self.phase,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second. Call once per elapsed second
    /// while Running; completes the phase when the countdown hits zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.complete());
        }
        None
    }

    /// Finish the current phase immediately, regardless of remaining time.
    pub fn skip(&mut self) -> Option<Event> {
        Some(self.complete())
    }

    /// Manual phase change. Stops the countdown, discards (does not
    /// finalize) any open session, and readies the target phase.
    pub fn select_phase(&mut self, kind: PhaseKind) -> Option<Event> {
        self.state = TimerState::Ready;
        self.phase = kind;
        self.remaining_secs = self.durations.for_phase(kind);
        self.session_id = None;
        Some(Event::PhaseSelected {
            phase: kind,
            at: Utc::now(),
        })
    }

    /// Attach the persisted session id for the phase in progress.
    pub fn set_session(&mut self, id: String) {
        self.session_id = Some(id);
    }

    /// Bind or unbind the task that completed work phases are credited to.
    pub fn set_task(&mut self, id: Option<String>) {
        self.task_id = id;
    }

    /// Apply new durations, e.g. after a settings change. A Ready phase
    /// picks up the new duration immediately; a Running or Paused countdown
    /// keeps its remaining time.
    pub fn set_durations(&mut self, durations: PhaseDurations) {
        self.durations = durations;
        if self.state == TimerState::Ready {
            self.remaining_secs = self.total_secs();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Event {
        let finished = self.phase;
        let session_id = self.session_id.take();

        let next = if finished == PhaseKind::Work {
            self.completed_work_phases += 1;
            if self.completed_work_phases % self.durations.long_break_cadence.max(1) == 0 {
                PhaseKind::LongBreak
            } else {
                PhaseKind::ShortBreak
            }
        } else {
            PhaseKind::Work
        };

        self.state = TimerState::Ready;
        self.phase = next;
        self.remaining_secs = self.durations.for_phase(next);

        Event::PhaseCompleted {
            phase: finished,
            next_phase: next,
            completed_work_phases: self.completed_work_phases,
            session_id,
            task_id: self.task_id.clone(),
            at: Utc::now(),
        }
    }
}
