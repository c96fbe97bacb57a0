//! Database schema.
//!
//! The SQL lives in the workspace `migrations/` directory and is embedded at
//! compile time.

use sqlx::migrate::Migrator;

/// Applies the campaign, archetype and identity tables.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
