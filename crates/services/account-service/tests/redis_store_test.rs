//! Redis token store against a live server.
//!
//! Runs only when `REDIS_URL` is set; each test works in its own hash so
//! runs never see each other's sessions.

use std::env;

use tokio_test::{assert_err, assert_ok};

use account_service_lib::repository::{RedisTokenStore, TokenStore};
use common::AppError;
use domain::SessionToken;

async fn store() -> Option<RedisTokenStore> {
    let url = match env::var("REDIS_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("REDIS_URL not set, skipping Redis store test");
            return None;
        }
    };

    let key = format!("sessions:test:{}", SessionToken::generate("").token);
    Some(
        RedisTokenStore::connect(&url, key)
            .await
            .expect("redis connection"),
    )
}

#[tokio::test]
async fn issue_then_lookup() {
    let Some(store) = store().await else { return };

    let session = store.issue("alice").await.unwrap();

    assert_eq!(store.lookup(&session.token).await.unwrap(), "alice");
    assert_ok!(store.clear().await);
}

#[tokio::test]
async fn revoked_token_stays_dead() {
    let Some(store) = store().await else { return };
    let session = store.issue("alice").await.unwrap();

    assert_ok!(store.revoke(&session.token).await);

    let lookup = assert_err!(store.lookup(&session.token).await);
    assert!(matches!(lookup, AppError::InvalidToken));
    let again = assert_err!(store.revoke(&session.token).await);
    assert!(matches!(again, AppError::InvalidToken));

    assert_ok!(store.clear().await);
}

#[tokio::test]
async fn unknown_token_is_invalid() {
    let Some(store) = store().await else { return };

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
async fn sessions_are_independent() {
    let Some(store) = store().await else { return };
    let first = store.issue("alice").await.unwrap();
    let second = store.issue("alice").await.unwrap();

    assert_ne!(first.token, second.token);
    assert_ok!(store.revoke(&first.token).await);
    assert_eq!(store.lookup(&second.token).await.unwrap(), "alice");

    assert_ok!(store.clear().await);
}

#[tokio::test]
async fn clear_drops_every_session() {
    let Some(store) = store().await else { return };
    let first = store.issue("alice").await.unwrap();
    let second = store.issue("bob").await.unwrap();

    assert_ok!(store.clear().await);

    assert!(store.lookup(&first.token).await.is_err());
    assert!(store.lookup(&second.token).await.is_err());
}
