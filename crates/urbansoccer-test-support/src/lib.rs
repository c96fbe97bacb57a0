//! Shared test doubles and utilities for the Urban Soccer RPG backend.

mod clock;
mod identity;
mod repository;

pub use clock::FixedClock;
pub use identity::StaticIdentityProvider;
pub use repository::{
    FailingRepository, InMemoryStore, InterleavedReadRepository, MiscountingDeleteRepository,
    StaleActiveCheckRepository,
};
