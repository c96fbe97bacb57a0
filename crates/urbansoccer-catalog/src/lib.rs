//! Urban Soccer RPG: Archetype Catalog bounded context.
//!
//! Responsible for the selectable player archetypes: their stats, rarity
//! and availability for new campaigns.

pub mod application;
pub mod domain;
