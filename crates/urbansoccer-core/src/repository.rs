//! Storage abstractions.
//!
//! Records cross the storage boundary in a flat, loosely typed shape (status
//! as text, progress and stats as JSON documents). Each context owns the
//! conversion between these records and its typed domain model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::id::{ArchetypeId, CampaignId, UserId};

/// Status text of a campaign that is still being played.
pub const ACTIVE_STATUS: &str = "active";

/// Stored representation of a catalog archetype.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArchetype {
    /// Archetype identifier.
    pub id: ArchetypeId,
    /// Display name.
    pub name: String,
    /// Optional flavour text.
    pub description: Option<String>,
    /// Rarity tier as text.
    pub rarity: String,
    /// Fixed stat block as a JSON document.
    pub stats: serde_json::Value,
    /// Portrait location.
    pub image_url: Option<String>,
    /// 3D model location.
    pub model_url: Option<String>,
    /// Whether new campaigns may select this archetype.
    pub is_available: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Selection applied when listing archetypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchetypeFilter {
    /// Every archetype.
    All,
    /// Archetypes whose availability flag equals the given value.
    Availability(bool),
    /// Available archetypes of the given rarity.
    AvailableWithRarity(String),
}

/// Repository trait for the archetype catalog.
///
/// Implementations must not cache: every read reflects the latest write.
#[async_trait]
pub trait ArchetypeRepository: Send + Sync {
    /// Persists a new archetype and returns the stored record.
    async fn insert(&self, archetype: &StoredArchetype) -> Result<StoredArchetype, DomainError>;

    /// Loads one archetype.
    async fn find_by_id(&self, id: ArchetypeId) -> Result<Option<StoredArchetype>, DomainError>;

    /// Lists archetypes matching `filter`, ordered by name.
    async fn list(&self, filter: &ArchetypeFilter) -> Result<Vec<StoredArchetype>, DomainError>;

    /// Overwrites the mutable fields of an existing archetype. Returns `None`
    /// if the archetype no longer exists.
    async fn update(
        &self,
        archetype: &StoredArchetype,
    ) -> Result<Option<StoredArchetype>, DomainError>;

    /// Deletes an archetype, returning the number of records removed.
    async fn delete(&self, id: ArchetypeId) -> Result<u64, DomainError>;
}

/// Stored representation of a campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCampaign {
    /// Campaign identifier.
    pub id: CampaignId,
    /// Owning user.
    pub user_id: UserId,
    /// Archetype the campaign is played with.
    pub archetype_id: ArchetypeId,
    /// Optional display name.
    pub campaign_name: Option<String>,
    /// Lifecycle status as text.
    pub status: String,
    /// Progress record as a JSON document.
    pub progress: serde_json::Value,
    /// When the campaign was created.
    pub start_date: DateTime<Utc>,
    /// When the campaign was last mutated.
    pub last_played_date: DateTime<Utc>,
}

/// Public facts about a user. Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerSummary {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

/// A campaign joined with its archetype and owner.
///
/// Either side of the join may be missing if the referenced record has been
/// removed by its owning service.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCampaignDetails {
    /// The campaign itself.
    pub campaign: StoredCampaign,
    /// The referenced archetype, if it still exists.
    pub archetype: Option<StoredArchetype>,
    /// The owning user, if it still exists.
    pub owner: Option<OwnerSummary>,
}

/// Repository trait for campaigns.
///
/// At most one campaign per (owner, archetype) may carry
/// [`ACTIVE_STATUS`]. Implementations enforce this atomically with the write
/// and report a violation as `DomainError::Conflict`.
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Persists a new campaign and returns the stored record.
    async fn insert(&self, campaign: &StoredCampaign) -> Result<StoredCampaign, DomainError>;

    /// Loads a campaign only if it belongs to `owner`.
    async fn find_owned(
        &self,
        owner: UserId,
        id: CampaignId,
    ) -> Result<Option<StoredCampaign>, DomainError>;

    /// Lists the campaigns of `owner`, optionally restricted to one status,
    /// newest start first.
    async fn list_by_owner(
        &self,
        owner: UserId,
        status: Option<&str>,
    ) -> Result<Vec<StoredCampaign>, DomainError>;

    /// Finds the active campaign of `owner` against `archetype_id`, if any.
    async fn find_active(
        &self,
        owner: UserId,
        archetype_id: ArchetypeId,
    ) -> Result<Option<StoredCampaign>, DomainError>;

    /// Overwrites the mutable fields (name, status, progress, last played)
    /// of an existing campaign. Last write wins. Returns `None` if the
    /// campaign no longer exists.
    async fn save(&self, campaign: &StoredCampaign) -> Result<Option<StoredCampaign>, DomainError>;

    /// Deletes a campaign, returning the number of records removed.
    async fn delete(&self, id: CampaignId) -> Result<u64, DomainError>;

    /// Loads a campaign regardless of owner, joined with its archetype and
    /// owner summary.
    async fn find_with_details(
        &self,
        id: CampaignId,
    ) -> Result<Option<StoredCampaignDetails>, DomainError>;
}
