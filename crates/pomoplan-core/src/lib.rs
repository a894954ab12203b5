//! # Pomoplan Core Library
//!
//! Core business logic for Pomoplan, a timer-driven task planner. All
//! operations are available through a standalone CLI binary; any GUI would
//! be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pure state machine over whole seconds; the caller
//!   invokes `tick()` once per elapsed second and forwards the emitted
//!   events
//! - **Session Tracker**: consumes timer events and performs the
//!   persistence and notification side effects, optimistically
//! - **Estimator**: keyword-weighted heuristic mapping task text to a
//!   pomodoro estimate
//! - **Storage**: SQLite-based entity storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`SessionTracker`]: event-driven persistence
//! - [`estimator::estimate`]: pomodoro estimation
//! - [`Database`]: tasks, sessions, settings, and statistics
//! - [`Config`]: application configuration management

pub mod error;
pub mod estimator;
pub mod events;
pub mod identity;
pub mod notify;
pub mod session;
pub mod settings;
pub mod storage;
pub mod task;
pub mod timer;
pub mod tracker;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use identity::{IdentityProvider, ProfileIdentity, User};
pub use notify::{ConsoleNotifier, Notifier, NullNotifier};
pub use session::Session;
pub use settings::UserSettings;
pub use storage::{Config, Database, DayActivity, Stats};
pub use task::{Task, TaskStatus};
pub use timer::{PhaseDurations, PhaseKind, TimerEngine, TimerState};
pub use tracker::SessionTracker;
