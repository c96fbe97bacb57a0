//! Aggregate roots for the Archetype Catalog context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::ArchetypeId;
use urbansoccer_core::repository::StoredArchetype;

/// Shortest accepted archetype name, in characters.
pub const MIN_NAME_CHARS: usize = 3;

/// Longest accepted archetype name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Rarity tier of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Freely handed out.
    Default,
    /// Limited.
    Unique,
}

impl Rarity {
    /// Returns the storage/wire text for this rarity.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Unique => "unique",
        }
    }

    /// Parses rarity text.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for unknown text.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "default" => Ok(Self::Default),
            "unique" => Ok(Self::Unique),
            other => Err(DomainError::Validation(format!(
                "unknown rarity '{other}', expected 'default' or 'unique'"
            ))),
        }
    }
}

/// Fixed stat block of an archetype.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeStats {
    /// Hit points.
    pub health: u32,
    /// Attack rating.
    pub attack: u32,
    /// Defense rating.
    pub defense: u32,
    /// Name of the signature move.
    #[serde(default)]
    pub special_ability: Option<String>,
}

/// Partial update of an archetype. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchetypePatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New rarity.
    pub rarity: Option<Rarity>,
    /// New stat block.
    pub stats: Option<ArchetypeStats>,
    /// New portrait location.
    pub image_url: Option<String>,
    /// New model location.
    pub model_url: Option<String>,
}

impl ArchetypePatch {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.rarity.is_none()
            && self.stats.is_none()
            && self.image_url.is_none()
            && self.model_url.is_none()
    }
}

/// The aggregate root for a catalog archetype.
#[derive(Debug, Clone, PartialEq)]
pub struct Archetype {
    /// Aggregate identifier.
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

/// Trims and length-checks an archetype name.
fn validate_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    let chars = name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&chars) {
        return Err(DomainError::Validation(format!(
            "archetype name must be between {MIN_NAME_CHARS} and {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_owned())
}

impl Archetype {
    /// Creates a new archetype.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is out of bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ArchetypeId,
        name: &str,
        description: Option<String>,
        rarity: Rarity,
        stats: ArchetypeStats,
        image_url: Option<String>,
        model_url: Option<String>,
        is_available: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: validate_name(name)?,
            description,
            rarity,
            stats,
            image_url,
            model_url,
            is_available,
            created_at,
        })
    }

    /// Whether a new campaign may be started with this archetype.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.is_available
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the patch is empty or carries an
    /// out-of-bounds name. The archetype is left unchanged on error.
    pub fn apply_patch(&mut self, patch: ArchetypePatch) -> Result<(), DomainError> {
        if patch.is_empty() {
            return Err(DomainError::Validation("no fields to update".into()));
        }
        let name = patch.name.as_deref().map(validate_name).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(rarity) = patch.rarity {
            self.rarity = rarity;
        }
        if let Some(stats) = patch.stats {
            self.stats = stats;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(model_url) = patch.model_url {
            self.model_url = Some(model_url);
        }
        Ok(())
    }

    /// Flips the availability flag.
    pub fn toggle_availability(&mut self) {
        self.is_available = !self.is_available;
    }

    /// Converts to the stored representation.
    #[must_use]
    pub fn to_stored(&self) -> StoredArchetype {
        StoredArchetype {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            rarity: self.rarity.as_str().to_owned(),
            // Serialization of derived Serialize types to Value is infallible.
            stats: serde_json::to_value(&self.stats)
                .expect("ArchetypeStats serialization is infallible"),
            image_url: self.image_url.clone(),
            model_url: self.model_url.clone(),
            is_available: self.is_available,
            created_at: self.created_at,
        }
    }

    /// Reconstitutes an archetype from its stored representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the stored rarity or stats
    /// cannot be decoded.
    pub fn reconstitute(stored: StoredArchetype) -> Result<Self, DomainError> {
        let rarity = Rarity::parse(&stored.rarity).map_err(|_| {
            DomainError::Infrastructure(format!(
                "archetype {} has unreadable rarity '{}'",
                stored.id, stored.rarity
            ))
        })?;
        let stats: ArchetypeStats = serde_json::from_value(stored.stats).map_err(|e| {
            DomainError::Infrastructure(format!(
                "archetype {} stats deserialization failed: {e}",
                stored.id
            ))
        })?;
        Ok(Self {
            id: stored.id,
            name: stored.name,
            description: stored.description,
            rarity,
            stats,
            image_url: stored.image_url,
            model_url: stored.model_url,
            is_available: stored.is_available,
            created_at: stored.created_at,
        })
    }
}
