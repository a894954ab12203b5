//! Per-user timer preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One row per user, created lazily on first access with the classic
/// pomodoro defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    pub work_secs: u32,
    pub short_break_secs: u32,
    pub long_break_secs: u32,
    /// Work phases between long breaks, at least 1.
    pub long_break_cadence: u32,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            work_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            long_break_cadence: 4,
            sound_enabled: true,
            vibration_enabled: false,
            updated_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("work_secs", self.work_secs),
            ("short_break_secs", self.short_break_secs),
            ("long_break_secs", self.long_break_secs),
        ] {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "duration must be at least 1 second".to_string(),
                });
            }
        }
        if self.long_break_cadence == 0 {
            return Err(ValidationError::InvalidValue {
                field: "long_break_cadence".to_string(),
                message: "cadence must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
