//! Notification collaborator.
//!
//! Phase-completion cues are best-effort: failures are logged and
//! swallowed, never propagated back into the timer path.

use std::io::Write;

use tracing::{debug, warn};

pub trait Notifier {
    fn play_sound(&self);
    fn vibrate(&self);
}

/// Terminal notifier: rings the bell and prints a short line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn play_sound(&self) {
        let mut out = std::io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!("failed to ring terminal bell: {e}");
        }
    }

    fn vibrate(&self) {
        // No vibration hardware to talk to from a terminal.
        debug!("vibration requested; not supported in this environment");
    }
}

/// Notifier that does nothing. Used in tests and by non-interactive flows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn play_sound(&self) {}
    fn vibrate(&self) {}
}
