//! Application layer for the Archetype Catalog context.

pub mod command_handlers;
pub mod query_handlers;
