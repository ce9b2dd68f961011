//! Domain layer - Account and session entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Storage backends and the HTTP adapter share these types.

pub mod constants;
pub mod error;
pub mod password;
pub mod policy;
pub mod session;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use policy::{MinLength, PasswordPolicy};
pub use session::SessionToken;
pub use user::{NewUser, UserRecord};
