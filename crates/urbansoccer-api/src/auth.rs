//! Caller authentication.
//!
//! Handlers that act on behalf of a user take a [`Caller`] argument. The
//! extractor reads `Authorization: Bearer <token>` and asks the configured
//! `IdentityProvider` who holds the token; the resolved user id is then
//! trusted as-is.
//!
//! ```rust,ignore
//! async fn handler(Caller(user_id): Caller) -> impl IntoResponse {
//!     format!("User ID: {user_id}")
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError(DomainError::Unauthenticated))?;
        let user_id = state.identity.verify_bearer(token).await?;
        Ok(Self(user_id))
    }
}

/// Returns the token of a well-formed bearer `Authorization` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
