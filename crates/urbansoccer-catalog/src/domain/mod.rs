//! Domain model for the Archetype Catalog context.

pub mod aggregates;
pub mod commands;
