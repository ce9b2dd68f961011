//! In-memory stores backed by lock-guarded maps.
//!
//! Each store takes its write lock around the whole check-then-mutate
//! sequence, which is what makes `create` and `issue` race free.

use std::collections::{hash_map::Entry, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CredentialStore, TokenStore};
use common::{AppError, AppResult};
use domain::{SessionToken, UserRecord, TOKEN_ISSUE_ATTEMPTS};

/// Credential store holding records in a map.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn exists(&self, username: &str) -> AppResult<bool> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn create(&self, record: UserRecord) -> AppResult<()> {
        let mut users = self.users.write().await;
        match users.entry(record.username.clone()) {
            Entry::Occupied(_) => Err(AppError::already_exists("User")),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, username: &str) -> AppResult<UserRecord> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn clear(&self) -> AppResult<()> {
        self.users.write().await.clear();
        Ok(())
    }
}

#[derive(Default)]
struct TokenState {
    active: HashMap<String, String>,
    /// Every token ever handed out, revoked or not
    issued: HashSet<String>,
}

/// Token store holding sessions in a map.
///
/// `clear` drops active sessions but keeps the issue history, so a token
/// value is never handed out twice over the life of the store. The history
/// costs one retained token string per session ever issued and is only
/// released when the store is dropped; long-running deployments should use
/// the database or Redis backends.
#[derive(Default)]
pub struct MemoryTokenStore {
    state: RwLock<TokenState>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions that currently authenticate
    pub async fn active_count(&self) -> usize {
        self.state.read().await.active.len()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn issue(&self, username: &str) -> AppResult<SessionToken> {
        let mut state = self.state.write().await;

        for _ in 0..TOKEN_ISSUE_ATTEMPTS {
            let session = SessionToken::generate(username);
            if state.issued.insert(session.token.clone()) {
                state
                    .active
                    .insert(session.token.clone(), session.username.clone());
                return Ok(session);
            }
        }

        Err(AppError::internal("Could not generate a unique session token"))
    }

    async fn lookup(&self, token: &str) -> AppResult<String> {
        self.state
            .read()
            .await
            .active
            .get(token)
            .cloned()
            .ok_or(AppError::InvalidToken)
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        self.state
            .write()
            .await
            .active
            .remove(token)
            .map(|_| ())
            .ok_or(AppError::InvalidToken)
    }

    async fn clear(&self) -> AppResult<()> {
        self.state.write().await.active.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain::Password;

    use super::*;

    fn record(username: &str, password: &str) -> UserRecord {
        UserRecord::new(username, Password::hash(password).unwrap(), None)
    }

    #[tokio::test]
    async fn test_create_then_exists_and_get() {
        let store = MemoryCredentialStore::new();
        store.create(record("alice", "pw123")).await.unwrap();

        assert!(store.exists("alice").await.unwrap());
        assert!(!store.exists("bob").await.unwrap());
        assert_eq!(store.get("alice").await.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_create_duplicate_keeps_original() {
        let store = MemoryCredentialStore::new();
        store.create(record("carol", "pw")).await.unwrap();

        let result = store.create(record("carol", "otherpw")).await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
        assert!(store.validate_password("carol", "pw").await.unwrap());
        assert!(!store.validate_password("carol", "otherpw").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryCredentialStore::new();
        assert!(matches!(store.get("ghost").await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_validate_password_unknown_user() {
        let store = MemoryCredentialStore::new();
        let result = store.validate_password("ghost", "anything").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_credential_clear() {
        let store = MemoryCredentialStore::new();
        store.create(record("alice", "pw123")).await.unwrap();
        store.clear().await.unwrap();

        assert!(store.is_empty().await);
        assert!(!store.exists("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_create_single_winner() {
        let store = Arc::new(MemoryCredentialStore::new());
        let password = Password::hash("pw").unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let password = password.clone();
                tokio::spawn(async move {
                    store
                        .create(UserRecord::new("dave", password, None))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_issue_lookup_round_trip() {
        let store = MemoryTokenStore::new();
        let session = store.issue("alice").await.unwrap();

        assert_eq!(store.lookup(&session.token).await.unwrap(), "alice");
    }

    #[tokio::test]
    async fn test_revoke_is_final() {
        let store = MemoryTokenStore::new();
        let session = store.issue("alice").await.unwrap();

        store.revoke(&session.token).await.unwrap();

        assert!(matches!(
            store.lookup(&session.token).await,
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            store.revoke(&session.token).await,
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = MemoryTokenStore::new();

        assert!(matches!(
            store.lookup("never-issued").await,
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            store.revoke("never-issued").await,
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_clear_invalidates_all_sessions() {
        let store = MemoryTokenStore::new();
        let first = store.issue("alice").await.unwrap();
        let second = store.issue("bob").await.unwrap();

        store.clear().await.unwrap();

        assert_eq!(store.active_count().await, 0);
        assert!(store.lookup(&first.token).await.is_err());
        assert!(store.lookup(&second.token).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_keeps_issue_history() {
        let store = MemoryTokenStore::new();
        let revoked = store.issue("alice").await.unwrap();
        store.revoke(&revoked.token).await.unwrap();
        store.issue("bob").await.unwrap();

        store.clear().await.unwrap();

        let state = store.state.read().await;
        assert!(state.active.is_empty());
        assert_eq!(state.issued.len(), 2);
        assert!(state.issued.contains(&revoked.token));
    }

    #[tokio::test]
    async fn test_concurrent_issue_unique_tokens() {
        let store = Arc::new(MemoryTokenStore::new());

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.issue("alice").await })
            })
            .collect();

        let mut tokens = HashSet::new();
        for handle in handles {
            tokens.insert(handle.await.unwrap().unwrap().token);
        }

        assert_eq!(tokens.len(), 64);
        assert_eq!(store.active_count().await, 64);
    }
}
