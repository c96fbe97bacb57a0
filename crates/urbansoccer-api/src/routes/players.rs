//! Routes for the Archetype Catalog bounded context.
//!
//! Archetypes are served under `/players`, the name the game client uses for
//! them. Reads are public; writes require an authenticated caller.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use urbansoccer_core::command::Command;
use uuid::Uuid;

use urbansoccer_catalog::application::query_handlers::ArchetypeView;
use urbansoccer_catalog::application::{command_handlers, query_handlers};
use urbansoccer_catalog::domain::aggregates::{ArchetypePatch, ArchetypeStats, Rarity};
use urbansoccer_catalog::domain::commands;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

/// Query string for GET /players. At most one selector may be given.
#[derive(Debug, Default, Deserialize)]
pub struct ListPlayersQuery {
    /// Only archetypes whose availability matches.
    pub available: Option<bool>,
    /// Only available archetypes of this rarity.
    pub rarity: Option<String>,
}

/// Request body for POST /players.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `default`.
    pub rarity: Option<Rarity>,
    pub stats: ArchetypeStats,
    pub image_url: Option<String>,
    pub model_url: Option<String>,
    /// Defaults to `true`.
    pub is_available: Option<bool>,
}

/// Request body for PATCH /players/{id}. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rarity: Option<Rarity>,
    pub stats: Option<ArchetypeStats>,
    pub image_url: Option<String>,
    pub model_url: Option<String>,
}

impl From<UpdatePlayerRequest> for ArchetypePatch {
    fn from(request: UpdatePlayerRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            rarity: request.rarity,
            stats: request.stats,
            image_url: request.image_url,
            model_url: request.model_url,
        }
    }
}

/// Response body for GET /players.
#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    /// Archetypes ordered by name.
    pub players: Vec<ArchetypeView>,
}

/// GET /players
#[instrument(skip(state))]
async fn list_players(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListPlayersQuery>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let rarity = query.rarity.as_deref().map(Rarity::parse).transpose()?;
    let players =
        query_handlers::list_archetypes(query.available, rarity, &*state.archetypes).await?;
    Ok(Json(PlayerListResponse { players }))
}

/// GET /players/{id}
#[instrument(skip(state))]
async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<ArchetypeView>, ApiError> {
    let view = query_handlers::get_archetype_by_id(&player_id, &*state.archetypes).await?;
    Ok(Json(view))
}

/// POST /players
#[instrument(skip(state, request))]
async fn create_player(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<ArchetypeView>), ApiError> {
    let command = commands::CreateArchetype {
        correlation_id: Uuid::new_v4(),
        caller,
        name: request.name,
        description: request.description,
        rarity: request.rarity.unwrap_or(Rarity::Default),
        stats: request.stats,
        image_url: request.image_url,
        model_url: request.model_url,
        is_available: request.is_available.unwrap_or(true),
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling create_archetype command"
    );

    let archetype = command_handlers::handle_create_archetype(
        &command,
        state.clock.as_ref(),
        &*state.archetypes,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ArchetypeView::from(&archetype))))
}

/// PATCH /players/{id}
#[instrument(skip(state, request))]
async fn update_player(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(player_id): Path<String>,
    ApiJson(request): ApiJson<UpdatePlayerRequest>,
) -> Result<Json<ArchetypeView>, ApiError> {
    let command = commands::UpdateArchetype {
        correlation_id: Uuid::new_v4(),
        caller,
        archetype_id: player_id,
        patch: request.into(),
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling update_archetype command"
    );

    let archetype = command_handlers::handle_update_archetype(&command, &*state.archetypes).await?;

    Ok(Json(ArchetypeView::from(&archetype)))
}

/// PATCH /players/{id}/toggle-availability
#[instrument(skip(state))]
async fn toggle_player_availability(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(player_id): Path<String>,
) -> Result<Json<ArchetypeView>, ApiError> {
    let command = commands::ToggleArchetypeAvailability {
        correlation_id: Uuid::new_v4(),
        caller,
        archetype_id: player_id,
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling toggle_archetype_availability command"
    );

    let archetype =
        command_handlers::handle_toggle_archetype_availability(&command, &*state.archetypes)
            .await?;

    Ok(Json(ArchetypeView::from(&archetype)))
}

/// DELETE /players/{id}
#[instrument(skip(state))]
async fn delete_player(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(player_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteArchetype {
        correlation_id: Uuid::new_v4(),
        caller,
        archetype_id: player_id,
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling delete_archetype command"
    );

    command_handlers::handle_delete_archetype(&command, &*state.archetypes).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the catalog context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_players).post(create_player))
        .route(
            "/{id}",
            get(get_player).patch(update_player).delete(delete_player),
        )
        .route(
            "/{id}/toggle-availability",
            patch(toggle_player_availability),
        )
}
