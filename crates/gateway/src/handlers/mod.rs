//! HTTP handlers.

pub mod admin_handler;
pub mod health_handler;
pub mod session_handler;
pub mod user_handler;

pub use admin_handler::admin_routes;
pub use health_handler::health_routes;
pub use session_handler::{session_routes, SessionResponse};
pub use user_handler::user_routes;
