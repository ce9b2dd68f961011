//! Account Service Library
//!
//! Registration, login and session management over interchangeable
//! credential and token stores (memory, SQL database, Redis).

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::{AppError, AppResult, StorageBackend};
use domain::MinLength;

use crate::config::AccountServiceConfig;
use crate::infra::Database;
use crate::repository::{
    CredentialStore, DbCredentialStore, DbTokenStore, MemoryCredentialStore, MemoryTokenStore,
    RedisTokenStore, TokenStore,
};
use crate::service::{AccountManager, AccountService};

/// Build the account service with the stores named in `config`.
pub async fn build_account_service(
    config: &AccountServiceConfig,
) -> AppResult<Arc<dyn AccountService>> {
    let database = if config.uses_database() {
        Some(Database::connect_with_config(&config.database).await?)
    } else {
        None
    };

    let credentials: Arc<dyn CredentialStore> = match (config.credential_backend, &database) {
        (StorageBackend::Memory, _) => Arc::new(MemoryCredentialStore::new()),
        (StorageBackend::Database, Some(db)) => {
            Arc::new(DbCredentialStore::new(db.get_connection()))
        }
        (backend, _) => {
            return Err(AppError::internal(format!(
                "Unsupported credential backend: {}",
                backend
            )))
        }
    };

    let tokens: Arc<dyn TokenStore> = match (config.token_backend, &database) {
        (StorageBackend::Memory, _) => Arc::new(MemoryTokenStore::new()),
        (StorageBackend::Database, Some(db)) => Arc::new(DbTokenStore::new(db.get_connection())),
        (StorageBackend::Redis, _) => Arc::new(
            RedisTokenStore::connect(&config.cache.url, config.cache.sessions_key.clone()).await?,
        ),
        (backend, _) => {
            return Err(AppError::internal(format!(
                "Unsupported token backend: {}",
                backend
            )))
        }
    };

    info!(
        credentials = %config.credential_backend,
        tokens = %config.token_backend,
        "Account service ready"
    );

    Ok(Arc::new(AccountManager::with_policy(
        credentials,
        tokens,
        Arc::new(MinLength(config.min_password_length)),
    )))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AccountServiceConfig::from_env()?;
    let db = Database::connect_without_migrations(&config.database.url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
