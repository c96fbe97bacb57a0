//! Urban Soccer RPG: Campaign Lifecycle bounded context.
//!
//! Responsible for campaign creation against a catalog archetype, progress
//! recording, the active/completed/abandoned state machine, and the
//! ownership rules around all of it.

pub mod application;
pub mod domain;
