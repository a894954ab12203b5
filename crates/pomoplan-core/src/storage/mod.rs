mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, DayActivity, Stats};

use std::path::PathBuf;

/// Returns `~/.config/pomoplan[-dev]/` based on POMOPLAN_ENV.
///
/// Set POMOPLAN_ENV=dev to use the development data directory, or
/// POMOPLAN_DATA_DIR to point somewhere else entirely (tests do this).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    if let Ok(dir) = std::env::var("POMOPLAN_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomoplan-dev")
    } else {
        base_dir.join("pomoplan")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
