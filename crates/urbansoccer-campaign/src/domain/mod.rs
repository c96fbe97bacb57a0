//! Domain model for the Campaign Lifecycle context.

pub mod aggregates;
pub mod commands;
