//! Shared application state.

use std::sync::Arc;

use urbansoccer_core::clock::Clock;
use urbansoccer_core::identity::IdentityProvider;
use urbansoccer_core::repository::{ArchetypeRepository, CampaignRepository};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for deterministic time.
    pub clock: Arc<dyn Clock>,
    /// Campaign storage.
    pub campaigns: Arc<dyn CampaignRepository>,
    /// Archetype catalog storage.
    pub archetypes: Arc<dyn ArchetypeRepository>,
    /// Resolves bearer tokens to users.
    pub identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        campaigns: Arc<dyn CampaignRepository>,
        archetypes: Arc<dyn ArchetypeRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            clock,
            campaigns,
            archetypes,
            identity,
        }
    }
}
