//! Shared helpers for CLI commands.

use pomoplan_core::identity::{IdentityProvider, ProfileIdentity};
use pomoplan_core::{Config, Database, User};

/// Resolve the current user from the configured profile, creating the row
/// on first access. Without a logged-in profile this falls back to the
/// local user so the tool works out of the box.
pub fn current_user(db: &Database, config: &Config) -> Result<User, Box<dyn std::error::Error>> {
    let identity = ProfileIdentity::from_config(config);
    let email = identity
        .current_user()
        .unwrap_or_else(|| pomoplan_core::identity::LOCAL_USER.to_string());
    Ok(db.ensure_user(&email)?)
}
