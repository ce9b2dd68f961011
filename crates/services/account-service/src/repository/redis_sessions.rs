//! Redis-backed token store.
//!
//! All sessions live in one hash (token -> username). Revocation overwrites
//! the username with an empty tombstone instead of deleting the field, so
//! `HSETNX` keeps refusing a revoked token value on later issues.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Script};
use tracing::{debug, warn};

use super::TokenStore;
use common::{AppError, AppResult};
use domain::{SessionToken, TOKEN_ISSUE_ATTEMPTS};

/// Marks a revoked token inside the sessions hash.
const TOMBSTONE: &str = "";

/// Atomically tombstones a live token; returns 1 if it was live.
const REVOKE_SCRIPT: &str = r#"
local owner = redis.call('HGET', KEYS[1], ARGV[1])
if (not owner) or owner == '' then
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], '')
return 1
"#;

/// Token store over a Redis hash.
pub struct RedisTokenStore {
    conn: ConnectionManager,
    key: String,
    revoke_script: Script,
}

impl RedisTokenStore {
    /// Wrap an open connection; `key` names the sessions hash.
    pub fn new(conn: ConnectionManager, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
            revoke_script: Script::new(REVOKE_SCRIPT),
        }
    }

    /// Connect to Redis.
    pub async fn connect(url: &str, key: impl Into<String>) -> AppResult<Self> {
        debug!("Connecting to Redis at {}", url);
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, key))
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn issue(&self, username: &str) -> AppResult<SessionToken> {
        let mut conn = self.conn.clone();

        for _ in 0..TOKEN_ISSUE_ATTEMPTS {
            let session = SessionToken::generate(username);
            let inserted: bool = conn
                .hset_nx(&self.key, &session.token, &session.username)
                .await?;
            if inserted {
                return Ok(session);
            }
            warn!("Generated token collided with an existing one, retrying");
        }

        Err(AppError::internal("Could not generate a unique session token"))
    }

    async fn lookup(&self, token: &str) -> AppResult<String> {
        let mut conn = self.conn.clone();
        let owner: Option<String> = conn.hget(&self.key, token).await?;

        match owner {
            Some(username) if username != TOMBSTONE => Ok(username),
            _ => Err(AppError::InvalidToken),
        }
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let revoked: i64 = self
            .revoke_script
            .key(&self.key)
            .arg(token)
            .invoke_async(&mut conn)
            .await?;

        if revoked == 0 {
            return Err(AppError::InvalidToken);
        }

        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(&self.key).await?;
        Ok(())
    }
}
