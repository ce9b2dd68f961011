//! Repository layer: credential and token storage backends.

mod credential_repository;
pub mod entities;
mod memory;
mod redis_sessions;
mod token_repository;

pub use credential_repository::{CredentialStore, DbCredentialStore};
pub use memory::{MemoryCredentialStore, MemoryTokenStore};
pub use redis_sessions::RedisTokenStore;
pub use token_repository::{DbTokenStore, TokenStore};

#[cfg(any(test, feature = "test-utils"))]
pub use credential_repository::MockCredentialStore;
#[cfg(any(test, feature = "test-utils"))]
pub use token_repository::MockTokenStore;
