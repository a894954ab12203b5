//! Session tracker: persistence and notification side effects for timer
//! events.
//!
//! The timer engine stays pure; this component consumes its events and
//! performs the external calls. Persistence is optimistic: failures are
//! logged and swallowed, and the local timer state never rolls back. A
//! completion with no open session or no bound task is silently skipped.

use chrono::Utc;
use tracing::warn;

use crate::events::Event;
use crate::notify::Notifier;
use crate::settings::UserSettings;
use crate::storage::Database;
use crate::timer::{PhaseKind, TimerEngine};

pub struct SessionTracker<'a> {
    db: &'a Database,
    notifier: &'a dyn Notifier,
    user_id: String,
    settings: UserSettings,
}

impl<'a> SessionTracker<'a> {
    pub fn new(
        db: &'a Database,
        notifier: &'a dyn Notifier,
        user_id: String,
        settings: UserSettings,
    ) -> Self {
        Self {
            db,
            notifier,
            user_id,
            settings,
        }
    }

    /// React to one engine event.
    pub fn handle(&self, engine: &mut TimerEngine, event: &Event) {
        match event {
            Event::PhaseStarted {
                phase: PhaseKind::Work,
                duration_secs,
                task_id,
                ..
            } => {
                // Resuming from pause keeps the session already open.
                if engine.session_id().is_some() {
                    return;
                }
                match self
                    .db
                    .create_session(&self.user_id, task_id.as_deref(), *duration_secs)
                {
                    Ok(session) => engine.set_session(session.id),
                    Err(e) => warn!("failed to open session: {e}"),
                }
            }
            Event::PhaseCompleted {
                phase,
                session_id,
                task_id,
                ..
            } => {
                if let Some(id) = session_id {
                    if let Err(e) = self.db.finalize_session(id, Utc::now()) {
                        warn!("failed to finalize session {id}: {e}");
                    }
                }
                if *phase == PhaseKind::Work {
                    if let Some(id) = task_id {
                        self.credit_task(id);
                    }
                }
                self.notify();
            }
            _ => {}
        }
    }

    fn credit_task(&self, task_id: &str) {
        match self.db.get_task(&self.user_id, task_id) {
            Ok(Some(mut task)) => {
                task.record_completed_pomodoro(Utc::now());
                if let Err(e) = self.db.update_task(&task) {
                    warn!("failed to credit task {task_id}: {e}");
                }
            }
            // Task was deleted mid-session; nothing to credit.
            Ok(None) => {}
            Err(e) => warn!("failed to load task {task_id}: {e}"),
        }
    }

    fn notify(&self) {
        if self.settings.sound_enabled {
            self.notifier.play_sound();
        }
        if self.settings.vibration_enabled {
            self.notifier.vibrate();
        }
    }
}
