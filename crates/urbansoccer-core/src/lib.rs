//! Urban Soccer Core: shared domain abstractions.
//!
//! This crate defines the identifiers, storage traits and error type that
//! the catalog and campaign contexts depend on. It contains no
//! infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod id;
pub mod identity;
pub mod repository;
