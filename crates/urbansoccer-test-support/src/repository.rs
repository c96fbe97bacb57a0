//! In-memory and fault-injecting repositories for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::{ArchetypeId, CampaignId, UserId};
use urbansoccer_core::repository::{
    ACTIVE_STATUS, ArchetypeFilter, ArchetypeRepository, CampaignRepository, OwnerSummary,
    StoredArchetype, StoredCampaign, StoredCampaignDetails,
};

#[derive(Debug, Default)]
struct StoreState {
    archetypes: HashMap<ArchetypeId, StoredArchetype>,
    campaigns: HashMap<CampaignId, StoredCampaign>,
    owners: HashMap<UserId, OwnerSummary>,
}

impl StoreState {
    /// Returns a conflict if a campaign other than `campaign` already holds
    /// the active slot for its (owner, archetype) pair.
    fn check_active_slot(&self, campaign: &StoredCampaign) -> Result<(), DomainError> {
        if campaign.status != ACTIVE_STATUS {
            return Ok(());
        }
        let taken = self.campaigns.values().any(|other| {
            other.id != campaign.id
                && other.user_id == campaign.user_id
                && other.archetype_id == campaign.archetype_id
                && other.status == ACTIVE_STATUS
        });
        if taken {
            return Err(DomainError::Conflict(
                "an active campaign already exists for this player".into(),
            ));
        }
        Ok(())
    }
}

/// A single in-memory store that backs both repositories, so the details
/// join can see archetypes and owners. Enforces the one-active-campaign rule
/// under its lock, the way the database's partial unique index does.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user so the details join can resolve it.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn add_owner(&self, owner: OwnerSummary) {
        self.state.lock().unwrap().owners.insert(owner.id, owner);
    }

    /// Returns a snapshot of every stored campaign.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn campaigns(&self) -> Vec<StoredCampaign> {
        self.state
            .lock()
            .unwrap()
            .campaigns
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ArchetypeRepository for InMemoryStore {
    async fn insert(&self, archetype: &StoredArchetype) -> Result<StoredArchetype, DomainError> {
        self.state
            .lock()
            .unwrap()
            .archetypes
            .insert(archetype.id, archetype.clone());
        Ok(archetype.clone())
    }

    async fn find_by_id(&self, id: ArchetypeId) -> Result<Option<StoredArchetype>, DomainError> {
        Ok(self.state.lock().unwrap().archetypes.get(&id).cloned())
    }

    async fn list(&self, filter: &ArchetypeFilter) -> Result<Vec<StoredArchetype>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut found: Vec<StoredArchetype> = state
            .archetypes
            .values()
            .filter(|a| match filter {
                ArchetypeFilter::All => true,
                ArchetypeFilter::Availability(available) => a.is_available == *available,
                ArchetypeFilter::AvailableWithRarity(rarity) => {
                    a.is_available && a.rarity == *rarity
                }
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn update(
        &self,
        archetype: &StoredArchetype,
    ) -> Result<Option<StoredArchetype>, DomainError> {
        let mut state = self.state.lock().unwrap();
        match state.archetypes.get_mut(&archetype.id) {
            Some(existing) => {
                *existing = archetype.clone();
                Ok(Some(archetype.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: ArchetypeId) -> Result<u64, DomainError> {
        let removed = self.state.lock().unwrap().archetypes.remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}

#[async_trait]
impl CampaignRepository for InMemoryStore {
    async fn insert(&self, campaign: &StoredCampaign) -> Result<StoredCampaign, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.check_active_slot(campaign)?;
        state.campaigns.insert(campaign.id, campaign.clone());
        Ok(campaign.clone())
    }

    async fn find_owned(
        &self,
        owner: UserId,
        id: CampaignId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .campaigns
            .get(&id)
            .filter(|c| c.user_id == owner)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        status: Option<&str>,
    ) -> Result<Vec<StoredCampaign>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut found: Vec<StoredCampaign> = state
            .campaigns
            .values()
            .filter(|c| c.user_id == owner && status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(found)
    }

    async fn find_active(
        &self,
        owner: UserId,
        archetype_id: ArchetypeId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .campaigns
            .values()
            .find(|c| {
                c.user_id == owner && c.archetype_id == archetype_id && c.status == ACTIVE_STATUS
            })
            .cloned())
    }

    async fn save(&self, campaign: &StoredCampaign) -> Result<Option<StoredCampaign>, DomainError> {
        let mut state = self.state.lock().unwrap();
        if !state.campaigns.contains_key(&campaign.id) {
            return Ok(None);
        }
        state.check_active_slot(campaign)?;
        state.campaigns.insert(campaign.id, campaign.clone());
        Ok(Some(campaign.clone()))
    }

    async fn delete(&self, id: CampaignId) -> Result<u64, DomainError> {
        let removed = self.state.lock().unwrap().campaigns.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn find_with_details(
        &self,
        id: CampaignId,
    ) -> Result<Option<StoredCampaignDetails>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.campaigns.get(&id).map(|campaign| StoredCampaignDetails {
            campaign: campaign.clone(),
            archetype: state.archetypes.get(&campaign.archetype_id).cloned(),
            owner: state.owners.get(&campaign.user_id).cloned(),
        }))
    }
}

/// Wraps a campaign repository so that `find_active` never sees an existing
/// active campaign. Reproduces the interleaving where two creates both pass
/// the membership check before either has written.
#[derive(Debug)]
pub struct StaleActiveCheckRepository<R> {
    inner: Arc<R>,
}

impl<R> StaleActiveCheckRepository<R> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: Arc<R>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: CampaignRepository> CampaignRepository for StaleActiveCheckRepository<R> {
    async fn insert(&self, campaign: &StoredCampaign) -> Result<StoredCampaign, DomainError> {
        self.inner.insert(campaign).await
    }

    async fn find_owned(
        &self,
        owner: UserId,
        id: CampaignId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        self.inner.find_owned(owner, id).await
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        status: Option<&str>,
    ) -> Result<Vec<StoredCampaign>, DomainError> {
        self.inner.list_by_owner(owner, status).await
    }

    async fn find_active(
        &self,
        _owner: UserId,
        _archetype_id: ArchetypeId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        Ok(None)
    }

    async fn save(&self, campaign: &StoredCampaign) -> Result<Option<StoredCampaign>, DomainError> {
        self.inner.save(campaign).await
    }

    async fn delete(&self, id: CampaignId) -> Result<u64, DomainError> {
        self.inner.delete(id).await
    }

    async fn find_with_details(
        &self,
        id: CampaignId,
    ) -> Result<Option<StoredCampaignDetails>, DomainError> {
        self.inner.find_with_details(id).await
    }
}

/// Wraps a campaign repository so that `delete` acknowledges without
/// removing anything. Used to exercise the store-inconsistency path.
#[derive(Debug)]
pub struct MiscountingDeleteRepository<R> {
    inner: Arc<R>,
}

impl<R> MiscountingDeleteRepository<R> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: Arc<R>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: CampaignRepository> CampaignRepository for MiscountingDeleteRepository<R> {
    async fn insert(&self, campaign: &StoredCampaign) -> Result<StoredCampaign, DomainError> {
        self.inner.insert(campaign).await
    }

    async fn find_owned(
        &self,
        owner: UserId,
        id: CampaignId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        self.inner.find_owned(owner, id).await
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        status: Option<&str>,
    ) -> Result<Vec<StoredCampaign>, DomainError> {
        self.inner.list_by_owner(owner, status).await
    }

    async fn find_active(
        &self,
        owner: UserId,
        archetype_id: ArchetypeId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        self.inner.find_active(owner, archetype_id).await
    }

    async fn save(&self, campaign: &StoredCampaign) -> Result<Option<StoredCampaign>, DomainError> {
        self.inner.save(campaign).await
    }

    async fn delete(&self, _id: CampaignId) -> Result<u64, DomainError> {
        Ok(0)
    }

    async fn find_with_details(
        &self,
        id: CampaignId,
    ) -> Result<Option<StoredCampaignDetails>, DomainError> {
        self.inner.find_with_details(id).await
    }
}

/// Wraps a campaign repository so that `find_owned` waits until `readers`
/// callers have all read before any of them proceeds. Every concurrent
/// read-modify-write therefore starts from the same snapshot. Saves are
/// recorded in the order they reach the store.
#[derive(Debug)]
pub struct InterleavedReadRepository<R> {
    inner: Arc<R>,
    barrier: Barrier,
    saves: Mutex<Vec<StoredCampaign>>,
}

impl<R> InterleavedReadRepository<R> {
    /// Wraps `inner`, holding reads back until `readers` have arrived.
    #[must_use]
    pub fn new(inner: Arc<R>, readers: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(readers),
            saves: Mutex::new(Vec::new()),
        }
    }

    /// Returns every record passed to `save`, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saves(&self) -> Vec<StoredCampaign> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl<R: CampaignRepository> CampaignRepository for InterleavedReadRepository<R> {
    async fn insert(&self, campaign: &StoredCampaign) -> Result<StoredCampaign, DomainError> {
        self.inner.insert(campaign).await
    }

    async fn find_owned(
        &self,
        owner: UserId,
        id: CampaignId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        let found = self.inner.find_owned(owner, id).await;
        self.barrier.wait().await;
        found
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        status: Option<&str>,
    ) -> Result<Vec<StoredCampaign>, DomainError> {
        self.inner.list_by_owner(owner, status).await
    }

    async fn find_active(
        &self,
        owner: UserId,
        archetype_id: ArchetypeId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        self.inner.find_active(owner, archetype_id).await
    }

    async fn save(&self, campaign: &StoredCampaign) -> Result<Option<StoredCampaign>, DomainError> {
        let saved = self.inner.save(campaign).await?;
        self.saves.lock().unwrap().push(campaign.clone());
        Ok(saved)
    }

    async fn delete(&self, id: CampaignId) -> Result<u64, DomainError> {
        self.inner.delete(id).await
    }

    async fn find_with_details(
        &self,
        id: CampaignId,
    ) -> Result<Option<StoredCampaignDetails>, DomainError> {
        self.inner.find_with_details(id).await
    }
}

/// A repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingRepository;

fn connection_refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

#[async_trait]
impl ArchetypeRepository for FailingRepository {
    async fn insert(&self, _archetype: &StoredArchetype) -> Result<StoredArchetype, DomainError> {
        Err(connection_refused())
    }

    async fn find_by_id(&self, _id: ArchetypeId) -> Result<Option<StoredArchetype>, DomainError> {
        Err(connection_refused())
    }

    async fn list(&self, _filter: &ArchetypeFilter) -> Result<Vec<StoredArchetype>, DomainError> {
        Err(connection_refused())
    }

    async fn update(
        &self,
        _archetype: &StoredArchetype,
    ) -> Result<Option<StoredArchetype>, DomainError> {
        Err(connection_refused())
    }

    async fn delete(&self, _id: ArchetypeId) -> Result<u64, DomainError> {
        Err(connection_refused())
    }
}

#[async_trait]
impl CampaignRepository for FailingRepository {
    async fn insert(&self, _campaign: &StoredCampaign) -> Result<StoredCampaign, DomainError> {
        Err(connection_refused())
    }

    async fn find_owned(
        &self,
        _owner: UserId,
        _id: CampaignId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        Err(connection_refused())
    }

    async fn list_by_owner(
        &self,
        _owner: UserId,
        _status: Option<&str>,
    ) -> Result<Vec<StoredCampaign>, DomainError> {
        Err(connection_refused())
    }

    async fn find_active(
        &self,
        _owner: UserId,
        _archetype_id: ArchetypeId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        Err(connection_refused())
    }

    async fn save(
        &self,
        _campaign: &StoredCampaign,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        Err(connection_refused())
    }

    async fn delete(&self, _id: CampaignId) -> Result<u64, DomainError> {
        Err(connection_refused())
    }

    async fn find_with_details(
        &self,
        _id: CampaignId,
    ) -> Result<Option<StoredCampaignDetails>, DomainError> {
        Err(connection_refused())
    }
}
