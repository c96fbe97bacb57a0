//! Command handlers for the Campaign Lifecycle context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist.
//! Concurrent writes to one campaign are last-write-wins; the one-active
//! rule is enforced by the repository on every write.

use tracing::{debug, warn};
use urbansoccer_catalog::application::query_handlers::load_archetype;
use urbansoccer_core::clock::Clock;
use urbansoccer_core::command::Command;
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::CampaignId;
use urbansoccer_core::repository::{ArchetypeRepository, CampaignRepository};

use crate::application::query_handlers::load_owned;
use crate::domain::aggregates::Campaign;
use crate::domain::commands::{
    AbandonCampaign, CompleteCampaign, CreateCampaign, DeleteCampaign, UpdateCampaign,
    UpdateProgress,
};

/// Writes a campaign back, mapping a campaign deleted in the meantime to
/// `NotFound`.
async fn persist(
    campaign: &Campaign,
    repo: &dyn CampaignRepository,
) -> Result<Campaign, DomainError> {
    let stored = repo
        .save(&campaign.to_stored())
        .await?
        .ok_or(DomainError::NotFound("campaign"))?;
    Campaign::reconstitute(stored)
}

/// Handles the `CreateCampaign` command: checks the archetype, checks the
/// caller holds no active campaign against it, and persists a new campaign.
///
/// The handler generates the `campaign_id`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the archetype does not exist,
/// `DomainError::InvalidState` if it is not available,
/// `DomainError::Validation` if the name or progress is out of bounds, or
/// `DomainError::Conflict` if the caller already has an active campaign
/// against the archetype (including one written concurrently).
pub async fn handle_create_campaign(
    command: &CreateCampaign,
    clock: &dyn Clock,
    archetypes: &dyn ArchetypeRepository,
    campaigns: &dyn CampaignRepository,
) -> Result<Campaign, DomainError> {
    let archetype = load_archetype(&command.archetype_id, archetypes).await?;
    let campaign = Campaign::start(
        CampaignId::generate(),
        command.caller(),
        &archetype,
        command.campaign_name.clone(),
        command.progress.clone(),
        clock,
    )?;

    if let Some(existing) = campaigns.find_active(command.caller(), archetype.id).await? {
        debug!(
            campaign_id = %existing.id,
            archetype_id = %archetype.id,
            "caller already has an active campaign for archetype"
        );
        return Err(DomainError::Conflict(
            "an active campaign already exists for this player".into(),
        ));
    }

    let stored = campaigns.insert(&campaign.to_stored()).await?;
    Campaign::reconstitute(stored)
}

/// Handles the `UpdateCampaign` command.
///
/// A status in the patch is written without the active-only check that
/// [`handle_abandon_campaign`] and [`handle_complete_campaign`] apply.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign is missing or not owned
/// by the caller, `DomainError::Validation` if the patch is empty or out of
/// bounds, or `DomainError::Conflict` if reactivating would give the caller
/// two active campaigns against one archetype.
pub async fn handle_update_campaign(
    command: &UpdateCampaign,
    clock: &dyn Clock,
    repo: &dyn CampaignRepository,
) -> Result<Campaign, DomainError> {
    let mut campaign = load_owned(command.caller(), &command.campaign_id, repo).await?;
    campaign.apply_patch(command.patch.clone(), clock)?;
    persist(&campaign, repo).await
}

/// Handles the `UpdateProgress` command: replaces the whole progress record.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign is missing or not owned
/// by the caller, or `DomainError::Validation` if the progress is out of
/// bounds.
pub async fn handle_update_progress(
    command: &UpdateProgress,
    clock: &dyn Clock,
    repo: &dyn CampaignRepository,
) -> Result<Campaign, DomainError> {
    let mut campaign = load_owned(command.caller(), &command.campaign_id, repo).await?;
    campaign.record_progress(command.progress.clone(), clock)?;
    persist(&campaign, repo).await
}

/// Handles the `AbandonCampaign` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign is missing or not owned
/// by the caller, or `DomainError::InvalidState` if it is not active.
pub async fn handle_abandon_campaign(
    command: &AbandonCampaign,
    clock: &dyn Clock,
    repo: &dyn CampaignRepository,
) -> Result<Campaign, DomainError> {
    let mut campaign = load_owned(command.caller(), &command.campaign_id, repo).await?;
    campaign.abandon(clock)?;
    persist(&campaign, repo).await
}

/// Handles the `CompleteCampaign` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign is missing or not owned
/// by the caller, or `DomainError::InvalidState` if it is not active.
pub async fn handle_complete_campaign(
    command: &CompleteCampaign,
    clock: &dyn Clock,
    repo: &dyn CampaignRepository,
) -> Result<Campaign, DomainError> {
    let mut campaign = load_owned(command.caller(), &command.campaign_id, repo).await?;
    campaign.complete(clock)?;
    persist(&campaign, repo).await
}

/// Handles the `DeleteCampaign` command. Any status may be deleted.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign is missing or not owned
/// by the caller, or `DomainError::Infrastructure` if the store did not
/// remove exactly one record.
pub async fn handle_delete_campaign(
    command: &DeleteCampaign,
    repo: &dyn CampaignRepository,
) -> Result<(), DomainError> {
    let campaign = load_owned(command.caller(), &command.campaign_id, repo).await?;
    let removed = repo.delete(campaign.id).await?;
    if removed != 1 {
        warn!(
            campaign_id = %campaign.id,
            removed,
            "campaign delete removed an unexpected number of records"
        );
        return Err(DomainError::Infrastructure(format!(
            "deleting campaign {} removed {removed} records",
            campaign.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use urbansoccer_catalog::domain::aggregates::{Archetype, ArchetypeStats, Rarity};
    use urbansoccer_core::error::DomainError;
    use urbansoccer_core::id::{ArchetypeId, CampaignId, UserId};
    use urbansoccer_core::repository::{ArchetypeRepository, CampaignRepository};
    use urbansoccer_test_support::{
        FailingRepository, FixedClock, InMemoryStore, InterleavedReadRepository,
        MiscountingDeleteRepository, StaleActiveCheckRepository,
    };
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_abandon_campaign, handle_complete_campaign, handle_create_campaign,
        handle_delete_campaign, handle_update_campaign, handle_update_progress,
    };
    use crate::domain::aggregates::{Campaign, CampaignPatch, CampaignStatus, Progress};
    use crate::domain::commands::{
        AbandonCampaign, CompleteCampaign, CreateCampaign, DeleteCampaign, UpdateCampaign,
        UpdateProgress,
    };

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 12, 20, 0, 0).unwrap()
    }

    async fn seed_archetype(store: &InMemoryStore, available: bool) -> Archetype {
        let archetype = Archetype::new(
            ArchetypeId::generate(),
            "Shadow Knight",
            None,
            Rarity::Unique,
            ArchetypeStats {
                health: 120,
                attack: 15,
                defense: 10,
                special_ability: Some("Phantom Strike".into()),
            },
            None,
            None,
            available,
            fixed_now(),
        )
        .unwrap();
        ArchetypeRepository::insert(store, &archetype.to_stored())
            .await
            .unwrap();
        archetype
    }

    fn create_command(caller: UserId, archetype_id: ArchetypeId) -> CreateCampaign {
        CreateCampaign {
            correlation_id: Uuid::new_v4(),
            caller,
            archetype_id: archetype_id.to_string(),
            campaign_name: None,
            progress: None,
        }
    }

    async fn create(
        store: &InMemoryStore,
        clock: &FixedClock,
        caller: UserId,
        archetype_id: ArchetypeId,
    ) -> Result<Campaign, DomainError> {
        handle_create_campaign(&create_command(caller, archetype_id), clock, store, store).await
    }

    fn abandon_command(caller: UserId, campaign_id: CampaignId) -> AbandonCampaign {
        AbandonCampaign {
            correlation_id: Uuid::new_v4(),
            caller,
            campaign_id: campaign_id.to_string(),
        }
    }

    fn complete_command(caller: UserId, campaign_id: CampaignId) -> CompleteCampaign {
        CompleteCampaign {
            correlation_id: Uuid::new_v4(),
            caller,
            campaign_id: campaign_id.to_string(),
        }
    }

    fn delete_command(caller: UserId, campaign_id: CampaignId) -> DeleteCampaign {
        DeleteCampaign {
            correlation_id: Uuid::new_v4(),
            caller,
            campaign_id: campaign_id.to_string(),
        }
    }

    fn progress_command(
        caller: UserId,
        campaign_id: CampaignId,
        progress: Progress,
    ) -> UpdateProgress {
        UpdateProgress {
            correlation_id: Uuid::new_v4(),
            caller,
            campaign_id: campaign_id.to_string(),
            progress,
        }
    }

    fn update_command(
        caller: UserId,
        campaign_id: CampaignId,
        patch: CampaignPatch,
    ) -> UpdateCampaign {
        UpdateCampaign {
            correlation_id: Uuid::new_v4(),
            caller,
            campaign_id: campaign_id.to_string(),
            patch,
        }
    }

    #[tokio::test]
    async fn test_create_campaign_starts_active_with_default_progress() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let archetype = seed_archetype(&store, true).await;
        let caller = UserId::generate();

        // Act
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();

        // Assert
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.user_id, caller);
        assert_eq!(campaign.archetype_id, archetype.id);
        assert_eq!(campaign.start_date, fixed_now());
        assert_eq!(campaign.last_played_date, campaign.start_date);
        assert_eq!(campaign.progress, Progress::default());
        assert_eq!(store.campaigns().len(), 1);
    }

    #[tokio::test]
    async fn test_create_campaign_keeps_supplied_name_and_progress() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let archetype = seed_archetype(&store, true).await;
        let progress = Progress {
            level: 3,
            score: 1200,
            current_mission: "Derby Night".into(),
            inventory: vec!["boots".into(), "boots".into(), "whistle".into()],
        };
        let command = CreateCampaign {
            campaign_name: Some("Street Cup".into()),
            progress: Some(progress.clone()),
            ..create_command(UserId::generate(), archetype.id)
        };

        // Act
        let campaign = handle_create_campaign(&command, &clock, &store, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(campaign.campaign_name.as_deref(), Some("Street Cup"));
        assert_eq!(campaign.progress, progress);
    }

    #[tokio::test]
    async fn test_create_campaign_returns_not_found_for_unknown_archetype() {
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());

        let result = create(&store, &clock, UserId::generate(), ArchetypeId::generate()).await;

        assert!(matches!(result, Err(DomainError::NotFound("archetype"))));
    }

    #[tokio::test]
    async fn test_create_campaign_treats_malformed_archetype_id_as_not_found() {
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let command = CreateCampaign {
            archetype_id: "not-an-id".into(),
            ..create_command(UserId::generate(), ArchetypeId::generate())
        };

        let result = handle_create_campaign(&command, &clock, &store, &store).await;

        assert!(matches!(result, Err(DomainError::NotFound("archetype"))));
    }

    #[tokio::test]
    async fn test_create_campaign_rejects_unavailable_archetype_regardless_of_history() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let earlier = create(&store, &clock, caller, archetype.id).await.unwrap();
        handle_complete_campaign(&complete_command(caller, earlier.id), &clock, &store)
            .await
            .unwrap();
        let mut hidden = archetype.clone();
        hidden.toggle_availability();
        ArchetypeRepository::update(&store, &hidden.to_stored())
            .await
            .unwrap();

        // Act
        let result = create(&store, &clock, caller, archetype.id).await;

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_create_campaign_twice_while_active_is_conflict() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        create(&store, &clock, caller, archetype.id).await.unwrap();

        // Act
        let second = create(&store, &clock, caller, archetype.id).await;

        // Assert
        assert!(matches!(second, Err(DomainError::Conflict(_))));
        assert_eq!(store.campaigns().len(), 1);
    }

    #[tokio::test]
    async fn test_create_campaign_for_other_user_is_not_a_conflict() {
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let archetype = seed_archetype(&store, true).await;

        create(&store, &clock, UserId::generate(), archetype.id)
            .await
            .unwrap();
        let other = create(&store, &clock, UserId::generate(), archetype.id).await;

        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_create_campaign_race_past_membership_check_is_conflict() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let racing = StaleActiveCheckRepository::new(Arc::clone(&store));
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let command = create_command(caller, archetype.id);
        handle_create_campaign(&command, &clock, store.as_ref(), &racing)
            .await
            .unwrap();

        // Act
        let second = handle_create_campaign(&command, &clock, store.as_ref(), &racing).await;

        // Assert
        assert!(matches!(second, Err(DomainError::Conflict(_))));
        let active = store
            .campaigns()
            .into_iter()
            .filter(|c| c.status == "active")
            .count();
        assert_eq!(active, 1);
    }

    #[tokio::test]
    async fn test_create_campaign_after_completion_succeeds() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let first = create(&store, &clock, caller, archetype.id).await.unwrap();
        handle_complete_campaign(&complete_command(caller, first.id), &clock, &store)
            .await
            .unwrap();

        // Act
        let second = create(&store, &clock, caller, archetype.id).await.unwrap();

        // Assert
        assert_ne!(second.id, first.id);
        assert!(second.is_active());
    }

    #[tokio::test]
    async fn test_abandon_and_complete_are_mutually_exclusive_and_terminal() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        clock.advance(Duration::minutes(30));

        // Act
        let abandon = abandon_command(caller, campaign.id);
        let abandoned = handle_abandon_campaign(&abandon, &clock, &store)
            .await
            .unwrap();
        let complete_after =
            handle_complete_campaign(&complete_command(caller, campaign.id), &clock, &store).await;
        let abandon_after =
            handle_abandon_campaign(&abandon_command(caller, campaign.id), &clock, &store).await;

        // Assert
        assert_eq!(abandoned.status, CampaignStatus::Abandoned);
        assert_eq!(abandoned.last_played_date, fixed_now() + Duration::minutes(30));
        assert!(matches!(complete_after, Err(DomainError::InvalidState(_))));
        assert!(matches!(abandon_after, Err(DomainError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_complete_campaign_of_other_user_is_not_found() {
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, UserId::generate(), archetype.id)
            .await
            .unwrap();

        let command = complete_command(UserId::generate(), campaign.id);
        let result = handle_complete_campaign(&command, &clock, &store).await;

        assert!(matches!(result, Err(DomainError::NotFound("campaign"))));
    }

    #[tokio::test]
    async fn test_update_progress_replaces_whole_record() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        let rich = Progress {
            level: 7,
            score: 900,
            current_mission: "Rooftop Final".into(),
            inventory: vec!["ball".into(), "cones".into()],
        };
        handle_update_progress(&progress_command(caller, campaign.id, rich), &clock, &store)
            .await
            .unwrap();
        let score_only: Progress =
            serde_json::from_value(serde_json::json!({ "score": 50 })).unwrap();

        // Act
        let command = progress_command(caller, campaign.id, score_only);
        let updated = handle_update_progress(&command, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(updated.progress.score, 50);
        assert_eq!(updated.progress.level, 1);
        assert_eq!(updated.progress.current_mission, "First Mission");
        assert!(updated.progress.inventory.is_empty());
    }

    #[tokio::test]
    async fn test_update_progress_allowed_on_terminal_campaign() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        handle_abandon_campaign(&abandon_command(caller, campaign.id), &clock, &store)
            .await
            .unwrap();
        let progress = Progress {
            score: 10,
            ..Progress::default()
        };

        // Act
        let command = progress_command(caller, campaign.id, progress);
        let updated = handle_update_progress(&command, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(updated.status, CampaignStatus::Abandoned);
        assert_eq!(updated.progress.score, 10);
    }

    #[tokio::test]
    async fn test_update_progress_rejects_negative_score() {
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        let progress = Progress {
            score: -1,
            ..Progress::default()
        };

        let command = progress_command(caller, campaign.id, progress);
        let result = handle_update_progress(&command, &clock, &store).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_progress_updates_last_write_wins() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        // Both updates load the same snapshot before either writes.
        let interleaved = InterleavedReadRepository::new(Arc::clone(&store), 2);
        let first = progress_command(
            caller,
            campaign.id,
            Progress {
                score: 100,
                ..Progress::default()
            },
        );
        let second = progress_command(
            caller,
            campaign.id,
            Progress {
                level: 4,
                score: 200,
                ..Progress::default()
            },
        );

        // Act
        let (a, b) = tokio::join!(
            handle_update_progress(&first, &clock, &interleaved),
            handle_update_progress(&second, &clock, &interleaved),
        );

        // Assert
        a.unwrap();
        b.unwrap();
        let saves = interleaved.saves();
        assert_eq!(saves.len(), 2);
        assert_ne!(saves[0].progress, saves[1].progress);
        let stored = store.find_owned(caller, campaign.id).await.unwrap().unwrap();
        assert_eq!(stored.progress, saves[1].progress);
    }

    #[tokio::test]
    async fn test_update_campaign_checks_ownership_before_emptiness() {
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, UserId::generate(), archetype.id)
            .await
            .unwrap();

        let result = handle_update_campaign(
            &update_command(UserId::generate(), campaign.id, CampaignPatch::default()),
            &clock,
            &store,
        )
        .await;

        assert!(matches!(result, Err(DomainError::NotFound("campaign"))));
    }

    #[tokio::test]
    async fn test_update_campaign_rejects_empty_patch() {
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();

        let result = handle_update_campaign(
            &update_command(caller, campaign.id, CampaignPatch::default()),
            &clock,
            &store,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_campaign_renames_and_refreshes_last_played() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        clock.advance(Duration::hours(2));
        let patch = CampaignPatch {
            campaign_name: Some(Some("Night League".into())),
            ..CampaignPatch::default()
        };

        // Act
        let command = update_command(caller, campaign.id, patch);
        let updated = handle_update_campaign(&command, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(updated.campaign_name.as_deref(), Some("Night League"));
        assert_eq!(updated.status, CampaignStatus::Active);
        assert_eq!(updated.progress, campaign.progress);
        assert_eq!(updated.start_date, campaign.start_date);
        assert_eq!(updated.last_played_date, fixed_now() + Duration::hours(2));
    }

    #[tokio::test]
    async fn test_update_campaign_status_override_skips_active_only_guard() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        handle_complete_campaign(&complete_command(caller, campaign.id), &clock, &store)
            .await
            .unwrap();
        let patch = CampaignPatch {
            status: Some(CampaignStatus::Abandoned),
            ..CampaignPatch::default()
        };

        // Act
        let command = update_command(caller, campaign.id, patch);
        let updated = handle_update_campaign(&command, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(updated.status, CampaignStatus::Abandoned);
    }

    #[tokio::test]
    async fn test_update_campaign_reactivation_cannot_create_second_active() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let old = create(&store, &clock, caller, archetype.id).await.unwrap();
        handle_abandon_campaign(&abandon_command(caller, old.id), &clock, &store)
            .await
            .unwrap();
        create(&store, &clock, caller, archetype.id).await.unwrap();
        let patch = CampaignPatch {
            status: Some(CampaignStatus::Active),
            ..CampaignPatch::default()
        };

        // Act
        let result =
            handle_update_campaign(&update_command(caller, old.id, patch), &clock, &store).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_campaign_any_status_then_second_delete_not_found() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        handle_complete_campaign(&complete_command(caller, campaign.id), &clock, &store)
            .await
            .unwrap();

        // Act
        handle_delete_campaign(&delete_command(caller, campaign.id), &store)
            .await
            .unwrap();
        let second = handle_delete_campaign(&delete_command(caller, campaign.id), &store).await;

        // Assert
        assert!(matches!(second, Err(DomainError::NotFound("campaign"))));
        assert!(store.campaigns().is_empty());
    }

    #[tokio::test]
    async fn test_delete_campaign_of_other_user_is_not_found() {
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, UserId::generate(), archetype.id)
            .await
            .unwrap();

        let result =
            handle_delete_campaign(&delete_command(UserId::generate(), campaign.id), &store).await;

        assert!(matches!(result, Err(DomainError::NotFound("campaign"))));
        assert_eq!(store.campaigns().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_campaign_reports_store_inconsistency() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        let miscounting = MiscountingDeleteRepository::new(Arc::clone(&store));

        // Act
        let command = delete_command(caller, campaign.id);
        let result = handle_delete_campaign(&command, &miscounting).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_abandon_after_delete_is_not_found() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::new(fixed_now());
        let caller = UserId::generate();
        let archetype = seed_archetype(&store, true).await;
        let campaign = create(&store, &clock, caller, archetype.id).await.unwrap();
        CampaignRepository::delete(&store, campaign.id).await.unwrap();

        // Act
        let command = abandon_command(caller, campaign.id);
        let result = handle_abandon_campaign(&command, &clock, &store).await;

        // Assert
        assert!(matches!(result, Err(DomainError::NotFound("campaign"))));
    }

    #[tokio::test]
    async fn test_create_campaign_propagates_infrastructure_error() {
        let clock = FixedClock::new(fixed_now());
        let command = create_command(UserId::generate(), ArchetypeId::generate());

        let result =
            handle_create_campaign(&command, &clock, &FailingRepository, &FailingRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
