//! Query handlers for the Campaign Lifecycle context.
//!
//! Every read except the details view is scoped to the caller: a campaign
//! owned by someone else is indistinguishable from one that does not exist.

use chrono::{DateTime, Utc};
use serde::Serialize;
use urbansoccer_catalog::application::query_handlers::ArchetypeView;
use urbansoccer_catalog::domain::aggregates::Archetype;
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::{ArchetypeId, CampaignId, UserId};
use urbansoccer_core::repository::{CampaignRepository, OwnerSummary};

use crate::domain::aggregates::{Campaign, CampaignStatus, Progress};

/// Read-only view of a campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignView {
    /// The campaign identifier.
    pub id: CampaignId,
    /// The owning user.
    pub user_id: UserId,
    /// The archetype played.
    pub player_id: ArchetypeId,
    /// Optional display name.
    pub campaign_name: Option<String>,
    /// Lifecycle status.
    pub status: CampaignStatus,
    /// Current game state.
    pub progress: Progress,
    /// Creation timestamp.
    pub start_date: DateTime<Utc>,
    /// Timestamp of the latest mutation.
    pub last_played_date: DateTime<Utc>,
}

impl From<&Campaign> for CampaignView {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: campaign.id,
            user_id: campaign.user_id,
            player_id: campaign.archetype_id,
            campaign_name: campaign.campaign_name.clone(),
            status: campaign.status,
            progress: campaign.progress.clone(),
            start_date: campaign.start_date,
            last_played_date: campaign.last_played_date,
        }
    }
}

/// Public facts about a campaign's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerView {
    /// The user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

impl From<OwnerSummary> for OwnerView {
    fn from(owner: OwnerSummary) -> Self {
        Self {
            id: owner.id,
            name: owner.name,
            email: owner.email,
        }
    }
}

/// A campaign with its archetype and owner embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignDetailsView {
    /// The campaign fields.
    #[serde(flatten)]
    pub campaign: CampaignView,
    /// The archetype, or `None` if it has since been removed.
    pub player: Option<ArchetypeView>,
    /// The owner, or `None` if the account has since been removed.
    pub user: Option<OwnerView>,
}

/// Loads a campaign owned by `caller`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the identifier is malformed, unknown,
/// or names another user's campaign.
pub(crate) async fn load_owned(
    caller: UserId,
    raw_id: &str,
    repo: &dyn CampaignRepository,
) -> Result<Campaign, DomainError> {
    let id = CampaignId::parse(raw_id).ok_or(DomainError::NotFound("campaign"))?;
    let stored = repo
        .find_owned(caller, id)
        .await?
        .ok_or(DomainError::NotFound("campaign"))?;
    Campaign::reconstitute(stored)
}

async fn list_owned(
    caller: UserId,
    status: Option<CampaignStatus>,
    repo: &dyn CampaignRepository,
) -> Result<Vec<CampaignView>, DomainError> {
    repo.list_by_owner(caller, status.map(CampaignStatus::as_str))
        .await?
        .into_iter()
        .map(|stored| Campaign::reconstitute(stored).map(|c| CampaignView::from(&c)))
        .collect()
}

/// Lists every campaign of `caller`, newest first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the lookup or decoding fails.
pub async fn list_campaigns(
    caller: UserId,
    repo: &dyn CampaignRepository,
) -> Result<Vec<CampaignView>, DomainError> {
    list_owned(caller, None, repo).await
}

/// Lists the active campaigns of `caller`, newest first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the lookup or decoding fails.
pub async fn list_active_campaigns(
    caller: UserId,
    repo: &dyn CampaignRepository,
) -> Result<Vec<CampaignView>, DomainError> {
    list_owned(caller, Some(CampaignStatus::Active), repo).await
}

/// Retrieves one campaign of `caller`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign is missing or belongs to
/// another user.
pub async fn get_campaign(
    caller: UserId,
    raw_id: &str,
    repo: &dyn CampaignRepository,
) -> Result<CampaignView, DomainError> {
    let campaign = load_owned(caller, raw_id, repo).await?;
    Ok(CampaignView::from(&campaign))
}

/// Retrieves a campaign with its archetype and owner.
///
/// Unlike [`get_campaign`], this reports a campaign that exists but belongs
/// to someone else as `Forbidden` rather than hiding it.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign does not exist, or
/// `DomainError::Forbidden` if it belongs to another user.
pub async fn get_campaign_with_details(
    caller: UserId,
    raw_id: &str,
    repo: &dyn CampaignRepository,
) -> Result<CampaignDetailsView, DomainError> {
    let id = CampaignId::parse(raw_id).ok_or(DomainError::NotFound("campaign"))?;
    let details = repo
        .find_with_details(id)
        .await?
        .ok_or(DomainError::NotFound("campaign"))?;
    if details.campaign.user_id != caller {
        return Err(DomainError::Forbidden(
            "campaign belongs to another user".into(),
        ));
    }

    let campaign = Campaign::reconstitute(details.campaign)?;
    let player = details
        .archetype
        .map(Archetype::reconstitute)
        .transpose()?
        .map(|archetype| ArchetypeView::from(&archetype));
    Ok(CampaignDetailsView {
        campaign: CampaignView::from(&campaign),
        player,
        user: details.owner.map(OwnerView::from),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use urbansoccer_catalog::domain::aggregates::{Archetype, ArchetypeStats, Rarity};
    use urbansoccer_core::error::DomainError;
    use urbansoccer_core::id::{ArchetypeId, CampaignId, UserId};
    use urbansoccer_core::repository::{ArchetypeRepository, CampaignRepository, OwnerSummary};
    use urbansoccer_test_support::{FailingRepository, FixedClock, InMemoryStore};

    use crate::application::query_handlers::{
        get_campaign, get_campaign_with_details, list_active_campaigns, list_campaigns,
    };
    use crate::domain::aggregates::Campaign;

    fn archetype() -> Archetype {
        Archetype::new(
            ArchetypeId::generate(),
            "Elven Archer",
            None,
            Rarity::Unique,
            ArchetypeStats {
                health: 90,
                attack: 20,
                defense: 6,
                special_ability: Some("Eagle Eye".into()),
            },
            None,
            None,
            true,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    async fn seed_campaign(
        store: &InMemoryStore,
        clock: &FixedClock,
        owner: UserId,
        archetype: &Archetype,
    ) -> Campaign {
        let campaign = Campaign::start(
            CampaignId::generate(),
            owner,
            archetype,
            Some("Road to the final".into()),
            None,
            clock,
        )
        .unwrap();
        CampaignRepository::insert(store, &campaign.to_stored())
            .await
            .unwrap();
        campaign
    }

    #[tokio::test]
    async fn test_get_campaign_hides_other_users_campaign_as_not_found() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(Utc::now());
        let campaign = seed_campaign(&store, &clock, UserId::generate(), &archetype()).await;

        // Act
        let result = get_campaign(UserId::generate(), &campaign.id.to_string(), &store).await;

        // Assert
        assert!(matches!(result, Err(DomainError::NotFound("campaign"))));
    }

    #[tokio::test]
    async fn test_get_campaign_treats_malformed_id_as_not_found() {
        let store = InMemoryStore::new();

        let result = get_campaign(UserId::generate(), "64b7f0c2a1e4b3d2c1f0e9a8", &store).await;

        assert!(matches!(result, Err(DomainError::NotFound("campaign"))));
    }

    #[tokio::test]
    async fn test_details_distinguishes_forbidden_from_not_found() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(Utc::now());
        let campaign = seed_campaign(&store, &clock, UserId::generate(), &archetype()).await;
        let stranger = UserId::generate();

        // Act
        let foreign = get_campaign_with_details(stranger, &campaign.id.to_string(), &store).await;
        let missing =
            get_campaign_with_details(stranger, &CampaignId::generate().to_string(), &store).await;

        // Assert
        assert!(matches!(foreign, Err(DomainError::Forbidden(_))));
        assert!(matches!(missing, Err(DomainError::NotFound("campaign"))));
    }

    #[tokio::test]
    async fn test_details_embeds_archetype_and_owner() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(Utc::now());
        let owner = UserId::generate();
        let archetype = archetype();
        ArchetypeRepository::insert(&store, &archetype.to_stored())
            .await
            .unwrap();
        store.add_owner(OwnerSummary {
            id: owner,
            name: "Ana".into(),
            email: "ana@example.com".into(),
        });
        let campaign = seed_campaign(&store, &clock, owner, &archetype).await;

        // Act
        let details = get_campaign_with_details(owner, &campaign.id.to_string(), &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(details.campaign.id, campaign.id);
        assert_eq!(details.player.unwrap().name, "Elven Archer");
        let user = details.user.unwrap();
        assert_eq!(user.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_details_serializes_flat_campaign_without_credentials() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(Utc::now());
        let owner = UserId::generate();
        store.add_owner(OwnerSummary {
            id: owner,
            name: "Ana".into(),
            email: "ana@example.com".into(),
        });
        let campaign = seed_campaign(&store, &clock, owner, &archetype()).await;

        // Act
        let details = get_campaign_with_details(owner, &campaign.id.to_string(), &store)
            .await
            .unwrap();
        let json = serde_json::to_value(&details).unwrap();

        // Assert
        assert_eq!(json["campaignName"], "Road to the final");
        assert_eq!(json["playerId"], campaign.archetype_id.to_string());
        assert!(json["player"].is_null());
        let user = json["user"].as_object().unwrap();
        let mut keys: Vec<&str> = user.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["email", "id", "name"]);
    }

    #[tokio::test]
    async fn test_list_active_campaigns_filters_by_status() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap());
        let owner = UserId::generate();
        let mut finished = seed_campaign(&store, &clock, owner, &archetype()).await;
        finished.complete(&clock).unwrap();
        store.save(&finished.to_stored()).await.unwrap();
        clock.advance(Duration::days(1));
        let running = seed_campaign(&store, &clock, owner, &archetype()).await;
        seed_campaign(&store, &clock, UserId::generate(), &archetype()).await;

        // Act
        let all = list_campaigns(owner, &store).await.unwrap();
        let active = list_active_campaigns(owner, &store).await.unwrap();

        // Assert
        let all_ids: Vec<CampaignId> = all.iter().map(|c| c.id).collect();
        assert_eq!(all_ids, [running.id, finished.id]);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, running.id);
    }

    #[tokio::test]
    async fn test_list_campaigns_propagates_infrastructure_error() {
        let result = list_campaigns(UserId::generate(), &FailingRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
