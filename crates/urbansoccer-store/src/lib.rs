//! PostgreSQL storage for the Urban Soccer RPG backend.
//!
//! Implements the core repository traits and the bearer-token identity
//! provider over a shared `PgPool`, and embeds the schema migrations.

pub mod pg_archetype_repository;
pub mod pg_campaign_repository;
pub mod pg_identity_provider;
pub mod schema;

use urbansoccer_core::error::DomainError;

/// Maps a driver error to an infrastructure failure, logging the detail.
pub(crate) fn infrastructure(operation: &'static str, error: &sqlx::Error) -> DomainError {
    tracing::error!(operation, error = %error, "database operation failed");
    DomainError::Infrastructure(format!("{operation} failed: {error}"))
}

/// Like [`infrastructure`], but reports a unique-index violation as a
/// conflict.
pub(crate) fn conflict_or_infrastructure(
    operation: &'static str,
    error: &sqlx::Error,
    conflict: &str,
) -> DomainError {
    match error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(conflict.to_owned())
        }
        other => infrastructure(operation, other),
    }
}
