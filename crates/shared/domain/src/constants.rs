//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length accepted by the default policy
pub const MIN_PASSWORD_LENGTH: usize = 1;

/// Longest username, in characters (matches the `users.username` column)
pub const MAX_USERNAME_LENGTH: usize = 64;

// =============================================================================
// Sessions
// =============================================================================

/// Random bytes drawn for each session token (256 bits)
pub const TOKEN_BYTES: usize = 32;

/// Attempts a token store makes before giving up on a colliding token
pub const TOKEN_ISSUE_ATTEMPTS: usize = 3;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
