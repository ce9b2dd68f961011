//! User record entity and registration input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::password::Password;

/// A registered account. Never mutated once created.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub password: Password,
    /// Contact address; carried but not interpreted
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a record from an already hashed password
    pub fn new(username: impl Into<String>, password: Password, email: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
            email,
            created_at: Utc::now(),
        }
    }
}

/// Registration candidate (plain text password, not yet validated)
#[derive(Clone, Deserialize, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .finish()
    }
}
