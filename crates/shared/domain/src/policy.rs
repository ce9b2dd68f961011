//! Pluggable password acceptance rules.

use crate::constants::MIN_PASSWORD_LENGTH;

/// Predicate deciding whether a candidate password may be registered.
pub trait PasswordPolicy: Send + Sync {
    /// Returns true if the candidate is acceptable.
    fn accepts(&self, candidate: &str) -> bool;
}

impl<F> PasswordPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accepts(&self, candidate: &str) -> bool {
        self(candidate)
    }
}

/// Requires at least `n` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLength(pub usize);

impl Default for MinLength {
    fn default() -> Self {
        MinLength(MIN_PASSWORD_LENGTH)
    }
}

impl PasswordPolicy for MinLength {
    fn accepts(&self, candidate: &str) -> bool {
        // At least one character is always required, whatever `n` says.
        !candidate.is_empty() && candidate.chars().count() >= self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rejects_only_empty() {
        let policy = MinLength::default();

        assert!(!policy.accepts(""));
        assert!(policy.accepts("p"));
        assert!(policy.accepts("pw123"));
    }

    #[test]
    fn test_min_length_counts_characters() {
        let policy = MinLength(3);

        assert!(!policy.accepts("ab"));
        assert!(policy.accepts("äöü"));
    }

    #[test]
    fn test_zero_length_still_rejects_empty() {
        assert!(!MinLength(0).accepts(""));
    }

    #[test]
    fn test_closure_policy() {
        let policy = |candidate: &str| candidate.chars().any(|c| c.is_ascii_digit());

        assert!(policy.accepts("pw123"));
        assert!(!policy.accepts("password"));
    }
}
