//! Account service - registration, login and logout.
//!
//! Owns every business rule of the account layer and maps store-level
//! outcomes onto the externally visible error kinds. Holds no state of its
//! own beyond handles to the two stores.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::repository::{CredentialStore, TokenStore};
use common::{AppError, AppResult};
use domain::{
    MinLength, NewUser, Password, PasswordPolicy, SessionToken, UserRecord, MAX_USERNAME_LENGTH,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account and open its first session
    async fn register(&self, candidate: NewUser) -> AppResult<SessionToken>;

    /// Open a new session for an existing account
    async fn login(&self, username: &str, password: &str) -> AppResult<SessionToken>;

    /// Close the session identified by `token`
    async fn logout(&self, token: &str) -> AppResult<()>;

    /// Resolve the username a live token belongs to
    async fn authenticate(&self, token: &str) -> AppResult<String>;

    /// Drop all accounts and sessions
    async fn clear(&self) -> AppResult<()>;
}

/// Concrete implementation of AccountService over pluggable stores.
pub struct AccountManager {
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<dyn TokenStore>,
    policy: Arc<dyn PasswordPolicy>,
}

impl AccountManager {
    /// Create a service using the default password policy
    pub fn new(credentials: Arc<dyn CredentialStore>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_policy(credentials, tokens, Arc::new(MinLength::default()))
    }

    /// Create a service with a custom password policy
    pub fn with_policy(
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenStore>,
        policy: Arc<dyn PasswordPolicy>,
    ) -> Self {
        Self {
            credentials,
            tokens,
            policy,
        }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(&self, candidate: NewUser) -> AppResult<SessionToken> {
        if self.credentials.exists(&candidate.username).await? {
            warn!(username = %candidate.username, "Registration rejected: username taken");
            return Err(AppError::already_exists("User"));
        }

        if !acceptable_username(&candidate.username) || !self.policy.accepts(&candidate.password) {
            warn!(username = %candidate.username, "Registration rejected: invalid credential");
            return Err(AppError::InvalidCredential);
        }

        let password = Password::hash(&candidate.password)?;
        let record = UserRecord::new(candidate.username, password, candidate.email);
        let username = record.username.clone();

        // The store rejects a duplicate that slipped past the check above
        self.credentials.create(record).await?;

        let session = self.tokens.issue(&username).await?;
        info!(username = %username, "User registered");
        Ok(session)
    }

    async fn login(&self, username: &str, password: &str) -> AppResult<SessionToken> {
        // Unknown user and wrong password must be indistinguishable
        let valid = match self.credentials.validate_password(username, password).await {
            Ok(valid) => valid,
            Err(AppError::NotFound) => false,
            Err(e) => return Err(e),
        };

        if !valid {
            warn!(username = %username, "Login rejected");
            return Err(AppError::InvalidCredential);
        }

        let session = self.tokens.issue(username).await?;
        info!(username = %username, "User logged in");
        Ok(session)
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        let username = self.tokens.lookup(token).await?;
        self.tokens.revoke(token).await?;

        info!(username = %username, "User logged out");
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> AppResult<String> {
        self.tokens.lookup(token).await
    }

    async fn clear(&self) -> AppResult<()> {
        self.credentials.clear().await?;
        self.tokens.clear().await?;

        info!("All accounts and sessions cleared");
        Ok(())
    }
}

fn acceptable_username(username: &str) -> bool {
    !username.trim().is_empty() && username.chars().count() <= MAX_USERNAME_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockCredentialStore, MockTokenStore};

    fn session(username: &str) -> SessionToken {
        SessionToken::generate(username)
    }

    fn manager(credentials: MockCredentialStore, tokens: MockTokenStore) -> AccountManager {
        AccountManager::new(Arc::new(credentials), Arc::new(tokens))
    }

    #[tokio::test]
    async fn test_register_success_creates_then_issues() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_exists().returning(|_| Ok(false));
        credentials
            .expect_create()
            .withf(|record| record.username == "alice" && record.password.verify("pw123"))
            .times(1)
            .returning(|_| Ok(()));

        let mut tokens = MockTokenStore::new();
        tokens
            .expect_issue()
            .withf(|username| username == "alice")
            .times(1)
            .returning(|username| Ok(session(username)));

        let service = manager(credentials, tokens);
        let result = service.register(NewUser::new("alice", "pw123")).await;

        assert_eq!(result.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_register_existing_username() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_exists().returning(|_| Ok(true));
        credentials.expect_create().never();

        let mut tokens = MockTokenStore::new();
        tokens.expect_issue().never();

        let service = manager(credentials, tokens);
        let result = service.register(NewUser::new("carol", "otherpw")).await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_empty_password_mutates_nothing() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_exists().returning(|_| Ok(false));
        credentials.expect_create().never();

        let mut tokens = MockTokenStore::new();
        tokens.expect_issue().never();

        let service = manager(credentials, tokens);
        let result = service.register(NewUser::new("bob", "")).await;

        assert!(matches!(result, Err(AppError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_register_empty_username() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_exists().returning(|_| Ok(false));
        credentials.expect_create().never();

        let service = manager(credentials, MockTokenStore::new());
        let result = service.register(NewUser::new("", "pw123")).await;

        assert!(matches!(result, Err(AppError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_register_overlong_username() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_exists().returning(|_| Ok(false));
        credentials.expect_create().never();

        let mut tokens = MockTokenStore::new();
        tokens.expect_issue().never();

        let service = manager(credentials, tokens);
        let too_long = "a".repeat(MAX_USERNAME_LENGTH + 1);
        let result = service.register(NewUser::new(too_long, "pw123")).await;

        assert!(matches!(result, Err(AppError::InvalidCredential)));
    }

    #[test]
    fn test_username_length_counts_characters() {
        assert!(acceptable_username(&"ä".repeat(MAX_USERNAME_LENGTH)));
        assert!(!acceptable_username(&"ä".repeat(MAX_USERNAME_LENGTH + 1)));
        assert!(!acceptable_username("   "));
    }

    #[tokio::test]
    async fn test_register_lost_race_issues_no_token() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_exists().returning(|_| Ok(false));
        credentials
            .expect_create()
            .returning(|_| Err(AppError::already_exists("User")));

        let mut tokens = MockTokenStore::new();
        tokens.expect_issue().never();

        let service = manager(credentials, tokens);
        let result = service.register(NewUser::new("dave", "pw")).await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_custom_policy() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_exists().returning(|_| Ok(false));
        credentials.expect_create().never();

        let service = AccountManager::with_policy(
            Arc::new(credentials),
            Arc::new(MockTokenStore::new()),
            Arc::new(MinLength(8)),
        );
        let result = service.register(NewUser::new("erin", "short")).await;

        assert!(matches!(result, Err(AppError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_validate_password()
            .withf(|username, password| username == "alice" && password == "pw123")
            .returning(|_, _| Ok(true));

        let mut tokens = MockTokenStore::new();
        tokens
            .expect_issue()
            .times(1)
            .returning(|username| Ok(session(username)));

        let service = manager(credentials, tokens);
        let result = service.login("alice", "pw123").await;

        assert_eq!(result.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_login_unknown_user_and_wrong_password_look_alike() {
        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_validate_password()
            .withf(|username, _| username == "nonexistent")
            .returning(|_, _| Err(AppError::NotFound));
        credentials
            .expect_validate_password()
            .withf(|username, _| username == "alice")
            .returning(|_, _| Ok(false));

        let mut tokens = MockTokenStore::new();
        tokens.expect_issue().never();

        let service = manager(credentials, tokens);
        let missing = service.login("nonexistent", "anything").await.unwrap_err();
        let wrong = service.login("alice", "wrong-password").await.unwrap_err();

        assert!(matches!(missing, AppError::InvalidCredential));
        assert!(matches!(wrong, AppError::InvalidCredential));
        assert_eq!(missing.code(), wrong.code());
        assert_eq!(missing.user_message(), wrong.user_message());
    }

    #[tokio::test]
    async fn test_login_storage_fault_propagates() {
        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_validate_password()
            .returning(|_, _| Err(AppError::internal("connection reset")));

        let service = manager(credentials, MockTokenStore::new());
        let result = service.login("alice", "pw123").await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_logout_revokes_after_lookup() {
        let mut tokens = MockTokenStore::new();
        tokens
            .expect_lookup()
            .withf(|token| token == "T1")
            .times(1)
            .returning(|_| Ok("alice".to_string()));
        tokens
            .expect_revoke()
            .withf(|token| token == "T1")
            .times(1)
            .returning(|_| Ok(()));

        let service = manager(MockCredentialStore::new(), tokens);

        assert!(service.logout("T1").await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_unknown_token_does_not_revoke() {
        let mut tokens = MockTokenStore::new();
        tokens
            .expect_lookup()
            .returning(|_| Err(AppError::InvalidToken));
        tokens.expect_revoke().never();

        let service = manager(MockCredentialStore::new(), tokens);
        let result = service.logout("stale").await;

        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_clear_resets_both_stores() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_clear().times(1).returning(|| Ok(()));
        let mut tokens = MockTokenStore::new();
        tokens.expect_clear().times(1).returning(|| Ok(()));

        let service = manager(credentials, tokens);

        assert!(service.clear().await.is_ok());
    }
}
