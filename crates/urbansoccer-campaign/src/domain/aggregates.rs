//! Aggregate roots for the Campaign Lifecycle context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use urbansoccer_catalog::domain::aggregates::Archetype;
use urbansoccer_core::clock::Clock;
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::{ArchetypeId, CampaignId, UserId};
use urbansoccer_core::repository::{ACTIVE_STATUS, StoredCampaign};

/// Longest accepted campaign name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Mission label every new campaign starts on.
pub const DEFAULT_MISSION: &str = "First Mission";

/// Lifecycle status of a campaign.
///
/// `Completed` and `Abandoned` are terminal for the dedicated transition
/// operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    /// Being played.
    Active,
    /// Finished successfully.
    Completed,
    /// Given up.
    Abandoned,
}

impl CampaignStatus {
    /// Returns the storage/wire text for this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => ACTIVE_STATUS,
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Parses status text.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for unknown text.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            ACTIVE_STATUS => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(DomainError::Validation(format!(
                "unknown campaign status '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game state carried by a campaign.
///
/// Fields missing from an incoming document take their starting values; a
/// progress record always replaces the previous one as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    /// Current level, starting at 1.
    pub level: i64,
    /// Accumulated score, never negative.
    pub score: i64,
    /// Label of the mission being played.
    pub current_mission: String,
    /// Item identifiers in pickup order. Duplicates are allowed.
    pub inventory: Vec<String>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            level: 1,
            score: 0,
            current_mission: DEFAULT_MISSION.to_owned(),
            inventory: Vec::new(),
        }
    }
}

impl Progress {
    /// Checks the numeric bounds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the level is below 1 or the
    /// score is negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.level < 1 {
            return Err(DomainError::Validation(
                "progress level must be at least 1".into(),
            ));
        }
        if self.score < 0 {
            return Err(DomainError::Validation(
                "progress score must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Fields the general update may change. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignPatch {
    /// New display name; `Some(None)` removes the name.
    pub campaign_name: Option<Option<String>>,
    /// New status. Bypasses the active-only guard of the dedicated
    /// transitions.
    pub status: Option<CampaignStatus>,
    /// Replacement progress record.
    pub progress: Option<Progress>,
}

impl CampaignPatch {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.campaign_name.is_none() && self.status.is_none() && self.progress.is_none()
    }
}

fn validate_name(name: Option<&str>) -> Result<(), DomainError> {
    match name {
        Some(name) if name.chars().count() > MAX_NAME_CHARS => Err(DomainError::Validation(
            format!("campaign name must be at most {MAX_NAME_CHARS} characters"),
        )),
        _ => Ok(()),
    }
}

/// The aggregate root for a campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    /// Aggregate identifier.
    pub id: CampaignId,
    /// Owning user. Fixed at creation.
    pub user_id: UserId,
    /// Archetype played. Fixed at creation.
    pub archetype_id: ArchetypeId,
    /// Optional display name.
    pub campaign_name: Option<String>,
    /// Lifecycle status.
    pub status: CampaignStatus,
    /// Current game state.
    pub progress: Progress,
    /// Creation timestamp. Fixed at creation.
    pub start_date: DateTime<Utc>,
    /// Timestamp of the latest mutation. Never earlier than `start_date`.
    pub last_played_date: DateTime<Utc>,
}

impl Campaign {
    /// Starts a new active campaign for `owner` against `archetype`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the archetype is not available,
    /// or `DomainError::Validation` if the name or initial progress is out
    /// of bounds.
    pub fn start(
        id: CampaignId,
        owner: UserId,
        archetype: &Archetype,
        campaign_name: Option<String>,
        progress: Option<Progress>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        if !archetype.is_selectable() {
            return Err(DomainError::InvalidState(format!(
                "archetype '{}' is not available",
                archetype.name
            )));
        }
        validate_name(campaign_name.as_deref())?;
        let progress = progress.unwrap_or_default();
        progress.validate()?;

        let now = clock.now();
        Ok(Self {
            id,
            user_id: owner,
            archetype_id: archetype.id,
            campaign_name,
            status: CampaignStatus::Active,
            progress,
            start_date: now,
            last_played_date: now,
        })
    }

    /// Whether the campaign is still being played.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }

    fn touch(&mut self, clock: &dyn Clock) {
        self.last_played_date = clock.now().max(self.start_date);
    }

    /// Replaces the whole progress record. Allowed in any status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the progress is out of bounds.
    pub fn record_progress(
        &mut self,
        progress: Progress,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        progress.validate()?;
        self.progress = progress;
        self.touch(clock);
        Ok(())
    }

    fn finish(&mut self, status: CampaignStatus, clock: &dyn Clock) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::InvalidState(format!(
                "campaign is {}, only active campaigns can be {status}",
                self.status
            )));
        }
        self.status = status;
        self.touch(clock);
        Ok(())
    }

    /// Moves an active campaign to `Abandoned`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the campaign is not active.
    pub fn abandon(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        self.finish(CampaignStatus::Abandoned, clock)
    }

    /// Moves an active campaign to `Completed`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the campaign is not active.
    pub fn complete(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        self.finish(CampaignStatus::Completed, clock)
    }

    /// Applies a general update. A supplied status is written as is,
    /// whatever the current status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the patch is empty or carries an
    /// out-of-bounds name or progress. The campaign is left unchanged on
    /// error.
    pub fn apply_patch(
        &mut self,
        patch: CampaignPatch,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if patch.is_empty() {
            return Err(DomainError::Validation("no fields to update".into()));
        }
        validate_name(patch.campaign_name.as_ref().and_then(Option::as_deref))?;
        if let Some(progress) = &patch.progress {
            progress.validate()?;
        }

        if let Some(name) = patch.campaign_name {
            self.campaign_name = name;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        self.touch(clock);
        Ok(())
    }

    /// Converts to the stored representation.
    #[must_use]
    pub fn to_stored(&self) -> StoredCampaign {
        StoredCampaign {
            id: self.id,
            user_id: self.user_id,
            archetype_id: self.archetype_id,
            campaign_name: self.campaign_name.clone(),
            status: self.status.as_str().to_owned(),
            // Serialization of derived Serialize types to Value is infallible.
            progress: serde_json::to_value(&self.progress)
                .expect("Progress serialization is infallible"),
            start_date: self.start_date,
            last_played_date: self.last_played_date,
        }
    }

    /// Reconstitutes a campaign from its stored representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the stored status or
    /// progress cannot be decoded.
    pub fn reconstitute(stored: StoredCampaign) -> Result<Self, DomainError> {
        let status = CampaignStatus::parse(&stored.status).map_err(|_| {
            DomainError::Infrastructure(format!(
                "campaign {} has unreadable status '{}'",
                stored.id, stored.status
            ))
        })?;
        let progress: Progress = serde_json::from_value(stored.progress).map_err(|e| {
            DomainError::Infrastructure(format!(
                "campaign {} progress deserialization failed: {e}",
                stored.id
            ))
        })?;
        Ok(Self {
            id: stored.id,
            user_id: stored.user_id,
            archetype_id: stored.archetype_id,
            campaign_name: stored.campaign_name,
            status,
            progress,
            start_date: stored.start_date,
            last_played_date: stored.last_played_date,
        })
    }
}
