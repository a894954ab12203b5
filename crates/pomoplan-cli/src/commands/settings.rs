//! Per-user timer settings commands.

use chrono::Utc;
use clap::Subcommand;

use pomoplan_core::{Config, Database};

use crate::common;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current user's settings as JSON
    Show,
    /// Update one or more settings fields
    Set {
        /// Work phase duration in seconds
        #[arg(long)]
        work_secs: Option<u32>,
        /// Short break duration in seconds
        #[arg(long)]
        short_break_secs: Option<u32>,
        /// Long break duration in seconds
        #[arg(long)]
        long_break_secs: Option<u32>,
        /// Work phases between long breaks
        #[arg(long)]
        cadence: Option<u32>,
        /// Play a sound on phase completion
        #[arg(long)]
        sound: Option<bool>,
        /// Vibrate on phase completion
        #[arg(long)]
        vibration: Option<bool>,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let user = common::current_user(&db, &config)?;
    let mut settings = db.get_or_create_settings(&user.id)?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Set {
            work_secs,
            short_break_secs,
            long_break_secs,
            cadence,
            sound,
            vibration,
        } => {
            if let Some(v) = work_secs {
                settings.work_secs = v;
            }
            if let Some(v) = short_break_secs {
                settings.short_break_secs = v;
            }
            if let Some(v) = long_break_secs {
                settings.long_break_secs = v;
            }
            if let Some(v) = cadence {
                settings.long_break_cadence = v;
            }
            if let Some(v) = sound {
                settings.sound_enabled = v;
            }
            if let Some(v) = vibration {
                settings.vibration_enabled = v;
            }
            settings.validate()?;
            settings.updated_at = Utc::now();
            db.save_settings(&settings)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}
