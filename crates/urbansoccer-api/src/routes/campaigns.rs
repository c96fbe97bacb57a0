//! Routes for the Campaign Lifecycle bounded context.
//!
//! Every route acts for the authenticated [`Caller`]; campaigns of other
//! users are reported as missing, except on the details route.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, instrument};
use urbansoccer_core::command::Command;
use urbansoccer_core::error::DomainError;
use uuid::Uuid;

use urbansoccer_campaign::application::query_handlers::{CampaignDetailsView, CampaignView};
use urbansoccer_campaign::application::{command_handlers, query_handlers};
use urbansoccer_campaign::domain::aggregates::{CampaignPatch, CampaignStatus, Progress};
use urbansoccer_campaign::domain::commands;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Request body for POST /campaigns.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    /// The archetype to play.
    pub player_id: String,
    /// Optional display name.
    pub campaign_name: Option<String>,
    /// Starting progress; the default progress when absent.
    pub progress: Option<Progress>,
}

/// Request body for PATCH /campaigns/{id}. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    /// New display name. An explicit `null` removes the name.
    #[serde(default, deserialize_with = "present")]
    pub campaign_name: Option<Option<String>>,
    /// New status, as status text.
    pub status: Option<String>,
    /// Replacement progress record.
    pub progress: Option<Progress>,
}

impl UpdateCampaignRequest {
    fn into_patch(self) -> Result<CampaignPatch, DomainError> {
        let status = self
            .status
            .as_deref()
            .map(CampaignStatus::parse)
            .transpose()?;
        Ok(CampaignPatch {
            campaign_name: self.campaign_name,
            status,
            progress: self.progress,
        })
    }
}

/// Wraps any value that is present in the document, `null` included, so it
/// can be told apart from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Response body for the list routes.
#[derive(Debug, Serialize)]
pub struct CampaignListResponse {
    /// Campaigns, newest first.
    pub campaigns: Vec<CampaignView>,
}

/// POST /campaigns
#[instrument(skip(state, request))]
async fn create_campaign(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<CampaignView>), ApiError> {
    let command = commands::CreateCampaign {
        correlation_id: Uuid::new_v4(),
        caller,
        archetype_id: request.player_id,
        campaign_name: request.campaign_name,
        progress: request.progress,
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling create_campaign command"
    );

    let campaign = command_handlers::handle_create_campaign(
        &command,
        state.clock.as_ref(),
        &*state.archetypes,
        &*state.campaigns,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CampaignView::from(&campaign))))
}

/// GET /campaigns
#[instrument(skip(state))]
async fn list_campaigns(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<CampaignListResponse>, ApiError> {
    let campaigns = query_handlers::list_campaigns(caller, &*state.campaigns).await?;
    Ok(Json(CampaignListResponse { campaigns }))
}

/// GET /campaigns/active
#[instrument(skip(state))]
async fn list_active_campaigns(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<CampaignListResponse>, ApiError> {
    let campaigns = query_handlers::list_active_campaigns(caller, &*state.campaigns).await?;
    Ok(Json(CampaignListResponse { campaigns }))
}

/// GET /campaigns/{id}
#[instrument(skip(state))]
async fn get_campaign(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(campaign_id): Path<String>,
) -> Result<Json<CampaignView>, ApiError> {
    let view = query_handlers::get_campaign(caller, &campaign_id, &*state.campaigns).await?;
    Ok(Json(view))
}

/// GET /campaigns/{id}/details
#[instrument(skip(state))]
async fn get_campaign_with_details(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(campaign_id): Path<String>,
) -> Result<Json<CampaignDetailsView>, ApiError> {
    let view =
        query_handlers::get_campaign_with_details(caller, &campaign_id, &*state.campaigns).await?;
    Ok(Json(view))
}

/// PATCH /campaigns/{id}
#[instrument(skip(state, request))]
async fn update_campaign(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(campaign_id): Path<String>,
    ApiJson(request): ApiJson<UpdateCampaignRequest>,
) -> Result<Json<CampaignView>, ApiError> {
    let command = commands::UpdateCampaign {
        correlation_id: Uuid::new_v4(),
        caller,
        campaign_id,
        patch: request.into_patch()?,
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling update_campaign command"
    );

    let campaign =
        command_handlers::handle_update_campaign(&command, state.clock.as_ref(), &*state.campaigns)
            .await?;

    Ok(Json(CampaignView::from(&campaign)))
}

/// PATCH /campaigns/{id}/progress
#[instrument(skip(state, progress))]
async fn update_progress(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(campaign_id): Path<String>,
    ApiJson(progress): ApiJson<Progress>,
) -> Result<Json<CampaignView>, ApiError> {
    let command = commands::UpdateProgress {
        correlation_id: Uuid::new_v4(),
        caller,
        campaign_id,
        progress,
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling update_progress command"
    );

    let campaign =
        command_handlers::handle_update_progress(&command, state.clock.as_ref(), &*state.campaigns)
            .await?;

    Ok(Json(CampaignView::from(&campaign)))
}

/// PATCH /campaigns/{id}/abandon
#[instrument(skip(state))]
async fn abandon_campaign(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(campaign_id): Path<String>,
) -> Result<Json<CampaignView>, ApiError> {
    let command = commands::AbandonCampaign {
        correlation_id: Uuid::new_v4(),
        caller,
        campaign_id,
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling abandon_campaign command"
    );

    let campaign = command_handlers::handle_abandon_campaign(
        &command,
        state.clock.as_ref(),
        &*state.campaigns,
    )
    .await?;

    Ok(Json(CampaignView::from(&campaign)))
}

/// PATCH /campaigns/{id}/complete
#[instrument(skip(state))]
async fn complete_campaign(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(campaign_id): Path<String>,
) -> Result<Json<CampaignView>, ApiError> {
    let command = commands::CompleteCampaign {
        correlation_id: Uuid::new_v4(),
        caller,
        campaign_id,
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling complete_campaign command"
    );

    let campaign = command_handlers::handle_complete_campaign(
        &command,
        state.clock.as_ref(),
        &*state.campaigns,
    )
    .await?;

    Ok(Json(CampaignView::from(&campaign)))
}

/// DELETE /campaigns/{id}
#[instrument(skip(state))]
async fn delete_campaign(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(campaign_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteCampaign {
        correlation_id: Uuid::new_v4(),
        caller,
        campaign_id,
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        caller = %command.caller(),
        "handling delete_campaign command"
    );

    command_handlers::handle_delete_campaign(&command, &*state.campaigns).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the campaign context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_campaigns).post(create_campaign))
        .route("/active", get(list_active_campaigns))
        .route(
            "/{id}",
            get(get_campaign)
                .patch(update_campaign)
                .delete(delete_campaign),
        )
        .route("/{id}/details", get(get_campaign_with_details))
        .route("/{id}/progress", patch(update_progress))
        .route("/{id}/abandon", patch(abandon_campaign))
        .route("/{id}/complete", patch(complete_campaign))
}
