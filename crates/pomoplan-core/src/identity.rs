//! Identity collaborator.
//!
//! The backing identity service is external to this core; all it has to
//! answer is "who is the current user". The default implementation reads
//! the profile stored in the application config, and callers fall back to
//! a local profile when nobody is logged in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Config;

/// Profile email used when no user is logged in.
pub const LOCAL_USER: &str = "local";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Answers who the current user is, if anyone.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<String>;
}

/// Identity backed by the `profile.user` config key.
#[derive(Debug, Clone, Default)]
pub struct ProfileIdentity {
    email: Option<String>,
}

impl ProfileIdentity {
    pub fn new(email: Option<String>) -> Self {
        Self { email }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            email: config.profile.user.clone(),
        }
    }

    /// Current user email, or the local fallback profile.
    pub fn resolve(&self) -> String {
        self.current_user().unwrap_or_else(|| LOCAL_USER.to_string())
    }
}

impl IdentityProvider for ProfileIdentity {
    fn current_user(&self) -> Option<String> {
        self.email.clone()
    }
}
