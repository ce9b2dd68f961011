//! Account service configuration.

use std::env;

use common::{AppError, AppResult, CacheConfig, DatabaseConfig, StorageBackend};
use domain::MIN_PASSWORD_LENGTH;

/// Account service configuration.
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Backend holding user records
    pub credential_backend: StorageBackend,
    /// Backend holding session tokens
    pub token_backend: StorageBackend,
    /// Database settings (used by `database` backends)
    pub database: DatabaseConfig,
    /// Redis settings (used by the `redis` token backend)
    pub cache: CacheConfig,
    /// Minimum password length for the default policy
    pub min_password_length: usize,
}

impl AccountServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; a set but unrecognised backend
    /// name is an error rather than a silent switch to memory.
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            credential_backend: backend(&var, "CREDENTIAL_BACKEND", defaults.credential_backend)?,
            token_backend: backend(&var, "TOKEN_BACKEND", defaults.token_backend)?,
            database: DatabaseConfig {
                url: var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: var("DATABASE_MAX_CONNECTIONS")
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(defaults.database.max_connections),
                min_connections: defaults.database.min_connections,
            },
            cache: CacheConfig {
                url: var("REDIS_URL").unwrap_or(defaults.cache.url),
                ..defaults.cache
            },
            min_password_length: var("MIN_PASSWORD_LENGTH")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.min_password_length),
        })
    }

    /// True if any store needs the SQL database.
    pub fn uses_database(&self) -> bool {
        self.credential_backend == StorageBackend::Database
            || self.token_backend == StorageBackend::Database
    }
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            credential_backend: StorageBackend::Memory,
            token_backend: StorageBackend::Memory,
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            min_password_length: MIN_PASSWORD_LENGTH,
        }
    }
}

fn backend<F>(var: &F, key: &str, default: StorageBackend) -> AppResult<StorageBackend>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(value) => StorageBackend::parse(&value).ok_or_else(|| {
            AppError::internal(format!("Unrecognised {} value: {:?}", key, value))
        }),
    }
}
