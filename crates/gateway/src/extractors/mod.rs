//! Request extractors.

mod auth;
mod validated_json;

pub use auth::{AuthToken, CurrentSession};
pub use validated_json::ValidatedJson;
