//! Profile management.
//!
//! Identity is a collaborator, not something this tool owns: "login" just
//! records which profile scopes reads and writes. Without one, everything
//! runs against the local fallback profile.

use clap::Subcommand;

use pomoplan_core::identity::{IdentityProvider, ProfileIdentity, LOCAL_USER};
use pomoplan_core::{Config, Database};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Switch to the profile with the given email, creating it if needed
    Login {
        /// Profile email
        email: String,
    },
    /// Switch back to the local profile
    Logout,
    /// Print the current profile
    Whoami,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();

    match action {
        AuthAction::Login { email } => {
            let db = Database::open()?;
            let user = db.ensure_user(&email)?;
            config.profile.user = Some(user.email.clone());
            config.save()?;
            println!("Logged in as {}", user.email);
        }
        AuthAction::Logout => {
            config.profile.user = None;
            config.save()?;
            println!("Logged out; using the {LOCAL_USER} profile");
        }
        AuthAction::Whoami => {
            let identity = ProfileIdentity::from_config(&config);
            match identity.current_user() {
                Some(email) => println!("{email}"),
                None => println!("{LOCAL_USER}"),
            }
        }
    }
    Ok(())
}
