//! Test identity provider backed by a fixed token table.

use std::collections::HashMap;

use async_trait::async_trait;
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::UserId;
use urbansoccer_core::identity::IdentityProvider;

/// Resolves bearer tokens from an in-memory table. Unknown tokens are
/// rejected as unauthenticated.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, UserId>,
}

impl StaticIdentityProvider {
    /// Creates a provider that knows no tokens.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as belonging to `user`.
    #[must_use]
    pub fn with_token(mut self, token: &str, user: UserId) -> Self {
        self.tokens.insert(token.to_owned(), user);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_bearer(&self, token: &str) -> Result<UserId, DomainError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or(DomainError::Unauthenticated)
    }
}
