use serde::{Deserialize, Serialize};

use crate::settings::UserSettings;

/// The three phase kinds the timer cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl PhaseKind {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseKind::Work => "Work",
            PhaseKind::ShortBreak => "Short Break",
            PhaseKind::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, PhaseKind::ShortBreak | PhaseKind::LongBreak)
    }
}

/// Configured phase durations and the long-break cadence.
///
/// Durations are whole seconds. Cadence is the number of completed work
/// phases between long breaks and must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub work_secs: u32,
    pub short_break_secs: u32,
    pub long_break_secs: u32,
    pub long_break_cadence: u32,
}

impl PhaseDurations {
    pub fn for_phase(&self, kind: PhaseKind) -> u32 {
        match kind {
            PhaseKind::Work => self.work_secs,
            PhaseKind::ShortBreak => self.short_break_secs,
            PhaseKind::LongBreak => self.long_break_secs,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            long_break_cadence: 4,
        }
    }
}

impl From<&UserSettings> for PhaseDurations {
    fn from(settings: &UserSettings) -> Self {
        Self {
            work_secs: settings.work_secs,
            short_break_secs: settings.short_break_secs,
            long_break_secs: settings.long_break_secs,
            long_break_cadence: settings.long_break_cadence.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations_are_the_classic_pomodoro() {
        let d = PhaseDurations::default();
        assert_eq!(d.work_secs, 1500);
        assert_eq!(d.short_break_secs, 300);
        assert_eq!(d.long_break_secs, 900);
        assert_eq!(d.long_break_cadence, 4);
    }

    #[test]
    fn for_phase_picks_the_right_field() {
        let d = PhaseDurations::default();
        assert_eq!(d.for_phase(PhaseKind::Work), d.work_secs);
        assert_eq!(d.for_phase(PhaseKind::ShortBreak), d.short_break_secs);
        assert_eq!(d.for_phase(PhaseKind::LongBreak), d.long_break_secs);
    }

    #[test]
    fn cadence_from_settings_is_clamped_to_one() {
        let mut settings = UserSettings::defaults_for("u1");
        settings.long_break_cadence = 0;
        let d = PhaseDurations::from(&settings);
        assert_eq!(d.long_break_cadence, 1);
    }
}
