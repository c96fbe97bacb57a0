//! Caller identity abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::id::UserId;

/// Verifies a presented credential and yields the caller's user id.
///
/// Token issuance lives outside this service; implementations only answer
/// "who holds this token right now". The returned id is trusted verbatim.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token to a user.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthenticated` if the token is unknown or
    /// expired, `DomainError::Infrastructure` if the lookup itself fails.
    async fn verify_bearer(&self, token: &str) -> Result<UserId, DomainError>;
}
