//! Password value object - salted one-way hash of a credential.
//!
//! Plain text never leaves this module: callers hash on the way in and
//! verify candidates against the stored PHC string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::error::{DomainError, DomainResult};

/// Hash verified against when the account does not exist, so a missing
/// username costs the same as a wrong password.
static DUMMY: Lazy<Password> = Lazy::new(|| {
    Password::hash("dummy-password-for-timing")
        .unwrap_or_else(|_| Password::from_hash(String::new()))
});

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password with a fresh random salt.
    ///
    /// Acceptability of the plain text (length, emptiness) is decided by a
    /// [`PasswordPolicy`](crate::PasswordPolicy) before this is called.
    pub fn hash(plain_text: &str) -> DomainResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Create a Password from an existing hash (from storage).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Process-wide hash used to equalise verification time for unknown users.
    pub fn dummy() -> &'static Password {
        &DUMMY
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text candidate against this hash.
    ///
    /// A stored value that is not a valid PHC string never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Self::argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}
