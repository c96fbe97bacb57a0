//! Query handlers for the Archetype Catalog context.
//!
//! Reads always go straight to the repository; the catalog keeps no cache,
//! so a campaign created right after an administrative write sees it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::ArchetypeId;
use urbansoccer_core::repository::{ArchetypeFilter, ArchetypeRepository};

use crate::domain::aggregates::{Archetype, ArchetypeStats, Rarity};

/// Read-only view of an archetype.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeView {
    /// The archetype identifier.
    pub id: ArchetypeId,
    /// Display name.
    pub name: String,
    /// Optional flavour text.
    pub description: Option<String>,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Fixed stat block.
    pub stats: ArchetypeStats,
    /// Portrait location.
    pub image_url: Option<String>,
    /// 3D model location.
    pub model_url: Option<String>,
    /// Whether new campaigns may select this archetype.
    pub is_available: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Archetype> for ArchetypeView {
    fn from(archetype: &Archetype) -> Self {
        Self {
            id: archetype.id,
            name: archetype.name.clone(),
            description: archetype.description.clone(),
            rarity: archetype.rarity,
            stats: archetype.stats.clone(),
            image_url: archetype.image_url.clone(),
            model_url: archetype.model_url.clone(),
            is_available: archetype.is_available,
            created_at: archetype.created_at,
        }
    }
}

/// Loads an archetype by its already-parsed identifier.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the lookup or decoding fails.
pub async fn find_archetype(
    id: ArchetypeId,
    repo: &dyn ArchetypeRepository,
) -> Result<Option<Archetype>, DomainError> {
    repo.find_by_id(id)
        .await?
        .map(Archetype::reconstitute)
        .transpose()
}

/// Loads an archetype by a raw identifier, treating a malformed identifier
/// the same as an unknown one.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the identifier is malformed or unknown.
/// Returns `DomainError::Infrastructure` if the lookup or decoding fails.
pub async fn load_archetype(
    raw_id: &str,
    repo: &dyn ArchetypeRepository,
) -> Result<Archetype, DomainError> {
    let id = ArchetypeId::parse(raw_id).ok_or(DomainError::NotFound("archetype"))?;
    find_archetype(id, repo)
        .await?
        .ok_or(DomainError::NotFound("archetype"))
}

/// Retrieves one archetype.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the identifier is malformed or unknown.
/// Returns `DomainError::Infrastructure` if the lookup or decoding fails.
pub async fn get_archetype_by_id(
    raw_id: &str,
    repo: &dyn ArchetypeRepository,
) -> Result<ArchetypeView, DomainError> {
    let archetype = load_archetype(raw_id, repo).await?;
    Ok(ArchetypeView::from(&archetype))
}

/// Lists archetypes. With no selector every archetype is returned; with
/// `available` the list is filtered on the availability flag; with `rarity`
/// only available archetypes of that rarity are returned.
///
/// # Errors
///
/// Returns `DomainError::Validation` if both selectors are given.
/// Returns `DomainError::Infrastructure` if the lookup or decoding fails.
pub async fn list_archetypes(
    available: Option<bool>,
    rarity: Option<Rarity>,
    repo: &dyn ArchetypeRepository,
) -> Result<Vec<ArchetypeView>, DomainError> {
    let filter = match (available, rarity) {
        (None, None) => ArchetypeFilter::All,
        (Some(flag), None) => ArchetypeFilter::Availability(flag),
        (None, Some(rarity)) => ArchetypeFilter::AvailableWithRarity(rarity.as_str().to_owned()),
        (Some(_), Some(_)) => {
            return Err(DomainError::Validation(
                "filter by either availability or rarity, not both".into(),
            ));
        }
    };

    repo.list(&filter)
        .await?
        .into_iter()
        .map(|stored| Archetype::reconstitute(stored).map(|a| ArchetypeView::from(&a)))
        .collect()
}
