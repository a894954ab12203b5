//! Timer control commands.
//!
//! The engine state is parked as JSON in the kv store between
//! invocations. On load, elapsed wall-clock seconds are replayed as ticks
//! so a countdown started in one invocation keeps running across the next.

use std::io::Write;

use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use pomoplan_core::{
    Config, ConsoleNotifier, Database, Event, PhaseDurations, PhaseKind, SessionTracker,
    TimerEngine, TimerState, UserSettings,
};

use crate::common;

const ENGINE_KEY: &str = "timer_engine";

#[derive(Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Work,
    ShortBreak,
    LongBreak,
}

impl From<PhaseArg> for PhaseKind {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Work => PhaseKind::Work,
            PhaseArg::ShortBreak => PhaseKind::ShortBreak,
            PhaseArg::LongBreak => PhaseKind::LongBreak,
        }
    }
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the current phase (opens a session for work phases)
    Start,
    /// Pause the running countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Finish the current phase immediately
    Skip,
    /// Reset the current phase to its full duration
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Switch to another phase, discarding any open session
    Select {
        /// Target phase
        phase: PhaseArg,
    },
    /// Run the countdown in the foreground (rolls into the next phase
    /// when auto_advance is on)
    Watch,
}

#[derive(Serialize, Deserialize)]
struct PersistedTimer {
    engine: TimerEngine,
    saved_at_epoch: i64,
}

pub(crate) fn load_engine(db: &Database, settings: &UserSettings) -> (TimerEngine, i64) {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(saved) = serde_json::from_str::<PersistedTimer>(&json) {
            let mut engine = saved.engine;
            engine.set_durations(PhaseDurations::from(settings));
            return (engine, saved.saved_at_epoch);
        }
    }
    (
        TimerEngine::new(PhaseDurations::from(settings)),
        Utc::now().timestamp(),
    )
}

pub(crate) fn save_engine(
    db: &Database,
    engine: &TimerEngine,
) -> Result<(), Box<dyn std::error::Error>> {
    let persisted = PersistedTimer {
        engine: engine.clone(),
        saved_at_epoch: Utc::now().timestamp(),
    };
    db.kv_set(ENGINE_KEY, &serde_json::to_string(&persisted)?)?;
    Ok(())
}

/// Replay wall-clock seconds that passed since the engine was saved.
/// Returns the completion event if the countdown ran out in the meantime.
fn catch_up(
    tracker: &SessionTracker,
    engine: &mut TimerEngine,
    saved_at_epoch: i64,
) -> Option<Event> {
    if engine.state() != TimerState::Running {
        return None;
    }
    let elapsed = (Utc::now().timestamp() - saved_at_epoch).max(0);
    for _ in 0..elapsed {
        if let Some(event) = engine.tick() {
            tracker.handle(engine, &event);
            return Some(event);
        }
    }
    None
}

fn watch(
    tracker: &SessionTracker,
    engine: &mut TimerEngine,
    auto_advance: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout();
    loop {
        if engine.state() != TimerState::Running {
            if let Some(event) = engine.start() {
                tracker.handle(engine, &event);
            }
        }

        while engine.state() == TimerState::Running {
            write!(out, "\r{} {} ", engine.phase().label(), engine.format_remaining())?;
            out.flush()?;
            std::thread::sleep(std::time::Duration::from_secs(1));
            if let Some(event) = engine.tick() {
                tracker.handle(engine, &event);
                writeln!(out)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
                break;
            }
        }

        if !auto_advance {
            return Ok(());
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let user = common::current_user(&db, &config)?;
    let settings = db.get_or_create_settings(&user.id)?;
    let notifier = ConsoleNotifier;
    let tracker = SessionTracker::new(&db, &notifier, user.id.clone(), settings.clone());

    let (mut engine, saved_at_epoch) = load_engine(&db, &settings);
    if let Some(event) = catch_up(&tracker, &mut engine, saved_at_epoch) {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }

    match action {
        TimerAction::Start | TimerAction::Resume => match engine.start() {
            Some(event) => {
                tracker.handle(&mut engine, &event);
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            None => println!("{}", serde_json::to_string_pretty(&engine.snapshot())?),
        },
        TimerAction::Pause => match engine.pause() {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::to_string_pretty(&engine.snapshot())?),
        },
        TimerAction::Skip => {
            if let Some(event) = engine.skip() {
                tracker.handle(&mut engine, &event);
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Reset => {
            if let Some(event) = engine.reset() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Select { phase } => {
            if let Some(event) = engine.select_phase(phase.into()) {
                tracker.handle(&mut engine, &event);
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
        TimerAction::Watch => watch(&tracker, &mut engine, config.auto_advance)?,
    }

    save_engine(&db, &engine)?;
    Ok(())
}
