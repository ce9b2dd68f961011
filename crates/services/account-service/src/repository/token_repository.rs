//! Token store contract and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::warn;

use super::credential_repository::is_unique_violation;
use super::entities::auth_token::{self, ActiveModel, Entity as TokenEntity};
use common::{AppError, AppResult};
use domain::{SessionToken, TOKEN_ISSUE_ATTEMPTS};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Storage of active session tokens.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Mint and persist a token for `username`.
    ///
    /// The returned token has never been handed out by this store before.
    async fn issue(&self, username: &str) -> AppResult<SessionToken>;

    /// Resolve a token to its username; `InvalidToken` if unknown or revoked
    async fn lookup(&self, token: &str) -> AppResult<String>;

    /// Revoke a token; `InvalidToken` if unknown or already revoked
    async fn revoke(&self, token: &str) -> AppResult<()>;

    /// Remove every token
    async fn clear(&self) -> AppResult<()>;
}

/// SeaORM-backed token store.
pub struct DbTokenStore {
    db: DatabaseConnection,
}

impl DbTokenStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenStore for DbTokenStore {
    async fn issue(&self, username: &str) -> AppResult<SessionToken> {
        for _ in 0..TOKEN_ISSUE_ATTEMPTS {
            let session = SessionToken::generate(username);
            let active_model = ActiveModel {
                token: Set(session.token.clone()),
                username: Set(session.username.clone()),
                created_at: Set(session.created_at),
                revoked_at: Set(None),
            };

            match TokenEntity::insert(active_model).exec(&self.db).await {
                Ok(_) => return Ok(session),
                Err(e) if is_unique_violation(&e) => {
                    warn!("Generated token collided with an existing one, retrying");
                }
                Err(e) => return Err(AppError::from(e)),
            }
        }

        Err(AppError::internal("Could not generate a unique session token"))
    }

    async fn lookup(&self, token: &str) -> AppResult<String> {
        TokenEntity::find_by_id(token.to_string())
            .filter(auth_token::Column::RevokedAt.is_null())
            .one(&self.db)
            .await?
            .map(|model| model.username)
            .ok_or(AppError::InvalidToken)
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        // Single conditional UPDATE so two concurrent revocations cannot both win
        let result = TokenEntity::update_many()
            .col_expr(
                auth_token::Column::RevokedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(auth_token::Column::Token.eq(token))
            .filter(auth_token::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::InvalidToken);
        }

        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        TokenEntity::delete_many().exec(&self.db).await?;
        Ok(())
    }
}
