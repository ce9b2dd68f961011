//! SeaORM entities.

pub mod auth_token;
pub mod user;
