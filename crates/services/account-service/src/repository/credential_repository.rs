//! Credential store contract and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{Password, UserRecord};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Storage of user records, keyed by username.
///
/// Implementations are plain data access: policy checks and error-kind
/// mapping live in the account service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// True iff a record with this username is present
    async fn exists(&self, username: &str) -> AppResult<bool>;

    /// Insert a record; `AlreadyExists` if the username is taken.
    ///
    /// The existence check and the insert are a single atomic step.
    async fn create(&self, record: UserRecord) -> AppResult<()>;

    /// Exact lookup; `NotFound` if absent
    async fn get(&self, username: &str) -> AppResult<UserRecord>;

    /// Remove every record
    async fn clear(&self) -> AppResult<()>;

    /// Check a candidate password against the stored hash.
    ///
    /// Fails with `NotFound` for unknown users, but only after spending the
    /// same hashing work a real comparison would.
    async fn validate_password(&self, username: &str, candidate: &str) -> AppResult<bool> {
        match self.get(username).await {
            Ok(record) => Ok(record.password.verify(candidate)),
            Err(AppError::NotFound) => {
                let _ = Password::dummy().verify(candidate);
                Err(AppError::NotFound)
            }
            Err(e) => Err(e),
        }
    }
}

/// SeaORM-backed credential store.
pub struct DbCredentialStore {
    db: DatabaseConnection,
}

impl DbCredentialStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for DbCredentialStore {
    async fn exists(&self, username: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, record: UserRecord) -> AppResult<()> {
        let active_model = ActiveModel {
            username: Set(record.username),
            password_hash: Set(record.password.into_string()),
            email: Set(record.email),
            created_at: Set(record.created_at),
        };

        // The primary key on username arbitrates concurrent registrations.
        match UserEntity::insert(active_model).exec(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(AppError::already_exists("User")),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn get(&self, username: &str) -> AppResult<UserRecord> {
        UserEntity::find_by_id(username.to_string())
            .one(&self.db)
            .await?
            .map(UserRecord::from)
            .ok_or(AppError::NotFound)
    }

    async fn clear(&self) -> AppResult<()> {
        UserEntity::delete_many().exec(&self.db).await?;
        Ok(())
    }
}

/// Whether an insert failed on a primary key or unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
