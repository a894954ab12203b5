use clap::Subcommand;

use pomoplan_core::{Config, Database};

use crate::common;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// All-time stats
    All,
    /// Completed sessions per day for the trailing week
    Week,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let user = common::current_user(&db, &config)?;

    match action {
        StatsAction::Today => {
            let stats = db.stats_today(&user.id)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::All => {
            let stats = db.stats_all(&user.id)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Week => {
            let week = db.weekly_activity(&user.id)?;
            println!("{}", serde_json::to_string_pretty(&week)?);
        }
    }
    Ok(())
}
