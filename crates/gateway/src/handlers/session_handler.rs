//! Session handlers: login, logout and caller lookup.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::SessionToken;

use crate::extractors::{AuthToken, CurrentSession, ValidatedJson};
use crate::state::AppState;

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "pw123")]
    pub password: String,
}

/// Session handed out by registration and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Account the token authenticates
    pub username: String,
    /// Opaque bearer token for the `authorization` header
    pub auth_token: String,
}

impl From<SessionToken> for SessionResponse {
    fn from(session: SessionToken) -> Self {
        Self {
            username: session.username,
            auth_token: session.token,
        }
    }
}

/// Caller identity
#[derive(Debug, Serialize, ToSchema)]
pub struct WhoAmIResponse {
    pub username: String,
}

/// Create session routes
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/session", post(login).delete(logout).get(current_session))
}

/// Log in and open a new session
#[utoipa::path(
    post,
    path = "/session",
    tag = "Sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state
        .accounts
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

/// Revoke the presented session token
#[utoipa::path(
    delete,
    path = "/session",
    tag = "Sessions",
    security(("session_token" = [])),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Token unknown or already revoked")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
) -> AppResult<Json<Value>> {
    state.accounts.logout(&token).await?;

    Ok(Json(json!({})))
}

/// Resolve the account behind the presented token
#[utoipa::path(
    get,
    path = "/session",
    tag = "Sessions",
    security(("session_token" = [])),
    responses(
        (status = 200, description = "Session is live", body = WhoAmIResponse),
        (status = 401, description = "Token unknown or revoked")
    )
)]
pub async fn current_session(session: CurrentSession) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        username: session.username,
    })
}
