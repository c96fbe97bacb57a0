//! Command handlers for the Archetype Catalog context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist.

use tracing::debug;
use urbansoccer_core::clock::Clock;
use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::ArchetypeId;
use urbansoccer_core::repository::ArchetypeRepository;

use crate::application::query_handlers::load_archetype;
use crate::domain::aggregates::Archetype;
use crate::domain::commands::{
    CreateArchetype, DeleteArchetype, ToggleArchetypeAvailability, UpdateArchetype,
};

/// Writes an archetype back, mapping a vanished row to `NotFound`.
async fn persist(
    archetype: &Archetype,
    repo: &dyn ArchetypeRepository,
) -> Result<Archetype, DomainError> {
    let stored = repo
        .update(&archetype.to_stored())
        .await?
        .ok_or(DomainError::NotFound("archetype"))?;
    Archetype::reconstitute(stored)
}

/// Handles the `CreateArchetype` command: validates the new archetype and
/// persists it.
///
/// The handler generates the `archetype_id`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is out of bounds, or
/// `DomainError::Infrastructure` if persisting fails.
pub async fn handle_create_archetype(
    command: &CreateArchetype,
    clock: &dyn Clock,
    repo: &dyn ArchetypeRepository,
) -> Result<Archetype, DomainError> {
    let archetype = Archetype::new(
        ArchetypeId::generate(),
        &command.name,
        command.description.clone(),
        command.rarity,
        command.stats.clone(),
        command.image_url.clone(),
        command.model_url.clone(),
        command.is_available,
        clock.now(),
    )?;

    let stored = repo.insert(&archetype.to_stored()).await?;
    debug!(archetype_id = %stored.id, name = %stored.name, "archetype created");
    Archetype::reconstitute(stored)
}

/// Handles the `UpdateArchetype` command: loads the archetype, applies the
/// patch, and persists the result.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the archetype does not exist,
/// `DomainError::Validation` if the patch is empty or invalid.
pub async fn handle_update_archetype(
    command: &UpdateArchetype,
    repo: &dyn ArchetypeRepository,
) -> Result<Archetype, DomainError> {
    let mut archetype = load_archetype(&command.archetype_id, repo).await?;
    archetype.apply_patch(command.patch.clone())?;
    persist(&archetype, repo).await
}

/// Handles the `ToggleArchetypeAvailability` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the archetype does not exist.
pub async fn handle_toggle_archetype_availability(
    command: &ToggleArchetypeAvailability,
    repo: &dyn ArchetypeRepository,
) -> Result<Archetype, DomainError> {
    let mut archetype = load_archetype(&command.archetype_id, repo).await?;
    archetype.toggle_availability();
    persist(&archetype, repo).await
}

/// Handles the `DeleteArchetype` command. Campaigns that reference the
/// archetype are left in place.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the identifier is malformed or nothing
/// was removed.
pub async fn handle_delete_archetype(
    command: &DeleteArchetype,
    repo: &dyn ArchetypeRepository,
) -> Result<(), DomainError> {
    let id =
        ArchetypeId::parse(&command.archetype_id).ok_or(DomainError::NotFound("archetype"))?;
    match repo.delete(id).await? {
        0 => Err(DomainError::NotFound("archetype")),
        _ => {
            debug!(archetype_id = %id, "archetype deleted");
            Ok(())
        }
    }
}
