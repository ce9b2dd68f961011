//! Store-wide reset.

use axum::{extract::State, response::Json, routing::delete, Router};
use serde_json::{json, Value};
use tracing::warn;

use common::{AppError, AppResult};

use crate::state::AppState;

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/db", delete(clear))
}

/// Remove every account and session
#[utoipa::path(
    delete,
    path = "/db",
    tag = "Admin",
    responses(
        (status = 200, description = "All accounts and sessions removed"),
        (status = 404, description = "Reset is disabled")
    )
)]
pub async fn clear(State(state): State<AppState>) -> AppResult<Json<Value>> {
    if !state.config.enable_reset {
        warn!("Reset requested while disabled");
        return Err(AppError::NotFound);
    }

    state.accounts.clear().await?;

    Ok(Json(json!({})))
}
