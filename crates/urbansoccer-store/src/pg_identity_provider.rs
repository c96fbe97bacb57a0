//! Bearer-token verification against the `access_tokens` table.
//!
//! Tokens are issued elsewhere and stored only as SHA-256 hex digests; this
//! provider hashes the presented token and looks for an unexpired match.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use urbansoccer_core::clock::Clock;
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::UserId;
use urbansoccer_core::identity::IdentityProvider;

use crate::infrastructure;

/// Returns the lowercase hex SHA-256 digest under which a token is stored.
#[must_use]
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// PostgreSQL-backed identity provider.
#[derive(Clone)]
pub struct PgIdentityProvider {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgIdentityProvider {
    /// Creates a new `PgIdentityProvider`. `clock` decides token expiry.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

impl std::fmt::Debug for PgIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgIdentityProvider")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn verify_bearer(&self, token: &str) -> Result<UserId, DomainError> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM access_tokens WHERE token_hash = $1 AND expires_at > $2",
        )
        .bind(token_digest(token))
        .bind(self.clock.now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infrastructure("verify bearer token", &e))?;
        user_id.map(UserId::from).ok_or(DomainError::Unauthenticated)
    }
}
