//! Session token entity.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::constants::TOKEN_BYTES;

/// An opaque bearer token authenticating one session of `username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl SessionToken {
    /// Mint a token with fresh randomness for `username`.
    ///
    /// Uniqueness against previously issued tokens is enforced by the store.
    pub fn generate(username: impl Into<String>) -> Self {
        Self {
            token: random_token(),
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}

/// 256 bits from the OS CSPRNG, URL-safe base64 without padding.
fn random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_binds_username() {
        let session = SessionToken::generate("alice");
        assert_eq!(session.username, "alice");
    }

    #[test]
    fn test_token_encoding() {
        let session = SessionToken::generate("alice");

        // 32 bytes -> 43 base64 characters without padding
        assert_eq!(session.token.len(), 43);
        assert!(session
            .token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..1000)
            .map(|_| SessionToken::generate("alice").token)
            .collect();
        assert_eq!(tokens.len(), 1000);
    }
}
