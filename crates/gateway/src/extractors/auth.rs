//! Session token extraction from the `authorization` header.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use common::AppError;
use domain::BEARER_TOKEN_PREFIX;

use crate::state::AppState;

/// Token presented by the caller, not yet checked against the store.
///
/// Accepts both a bare token and `Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::InvalidToken)?;

        let token = header
            .strip_prefix(BEARER_TOKEN_PREFIX)
            .unwrap_or(header)
            .trim();

        if token.is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(AuthToken(token.to_string()))
    }
}

/// Caller resolved through the account service.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub username: String,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthToken(token) = AuthToken::from_request_parts(parts, state).await?;
        let username = state.accounts.authenticate(&token).await?;

        Ok(CurrentSession { username, token })
    }
}
