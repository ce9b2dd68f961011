//! Registration handler.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::NewUser;

use crate::extractors::ValidatedJson;
use crate::handlers::SessionResponse;
use crate::state::AppState;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Unique account name (at most 64 characters)
    #[schema(example = "alice", max_length = 64)]
    pub username: String,
    /// Account password
    #[schema(example = "pw123")]
    pub password: String,
    /// Contact address; must look like an email when present
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        NewUser {
            username: req.username,
            password: req.password,
            email: req.email,
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", post(register))
}

/// Register a new user and open a session
#[utoipa::path(
    post,
    path = "/user",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = SessionResponse),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Username or password rejected"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state.accounts.register(payload.into()).await?;

    Ok(Json(SessionResponse::from(session)))
}
