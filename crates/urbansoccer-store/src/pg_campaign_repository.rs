//! `PostgreSQL` implementation of the `CampaignRepository` trait.
//!
//! The one-active-campaign rule is backed by the partial unique index
//! `uq_campaigns_one_active_per_archetype`; a violation on insert or save is
//! reported as `DomainError::Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::{ArchetypeId, CampaignId, UserId};
use urbansoccer_core::repository::{
    CampaignRepository, OwnerSummary, StoredArchetype, StoredCampaign, StoredCampaignDetails,
};

use crate::{conflict_or_infrastructure, infrastructure};

const DUPLICATE_ACTIVE: &str = "an active campaign already exists for this player";

macro_rules! columns {
    () => {
        "id, user_id, archetype_id, campaign_name, status, progress, start_date, last_played_date"
    };
}

const INSERT: &str = concat!(
    "INSERT INTO campaigns (",
    columns!(),
    ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING ",
    columns!()
);

const SELECT_OWNED: &str = concat!(
    "SELECT ",
    columns!(),
    " FROM campaigns WHERE id = $1 AND user_id = $2"
);

const SELECT_BY_OWNER: &str = concat!(
    "SELECT ",
    columns!(),
    " FROM campaigns WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2) \
     ORDER BY start_date DESC"
);

const SELECT_ACTIVE: &str = concat!(
    "SELECT ",
    columns!(),
    " FROM campaigns WHERE user_id = $1 AND archetype_id = $2 AND status = 'active' LIMIT 1"
);

const UPDATE: &str = concat!(
    "UPDATE campaigns \
     SET campaign_name = $2, status = $3, progress = $4, last_played_date = $5 \
     WHERE id = $1 RETURNING ",
    columns!()
);

// Credentials are never selected.
const SELECT_WITH_DETAILS: &str = "\
    SELECT c.id, c.user_id, c.archetype_id, c.campaign_name, c.status, c.progress, \
           c.start_date, c.last_played_date, \
           a.id AS archetype_row_id, a.name AS archetype_name, \
           a.description AS archetype_description, a.rarity AS archetype_rarity, \
           a.stats AS archetype_stats, a.image_url AS archetype_image_url, \
           a.model_url AS archetype_model_url, a.is_available AS archetype_is_available, \
           a.created_at AS archetype_created_at, \
           u.id AS owner_id, u.name AS owner_name, u.email AS owner_email \
    FROM campaigns c \
    LEFT JOIN archetypes a ON a.id = c.archetype_id \
    LEFT JOIN users u ON u.id = c.user_id \
    WHERE c.id = $1";

#[derive(Debug, sqlx::FromRow)]
struct CampaignRow {
    id: Uuid,
    user_id: Uuid,
    archetype_id: Uuid,
    campaign_name: Option<String>,
    status: String,
    progress: serde_json::Value,
    start_date: DateTime<Utc>,
    last_played_date: DateTime<Utc>,
}

impl From<CampaignRow> for StoredCampaign {
    fn from(row: CampaignRow) -> Self {
        Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            archetype_id: row.archetype_id.into(),
            campaign_name: row.campaign_name,
            status: row.status,
            progress: row.progress,
            start_date: row.start_date,
            last_played_date: row.last_played_date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DetailsRow {
    #[sqlx(flatten)]
    campaign: CampaignRow,
    archetype_row_id: Option<Uuid>,
    archetype_name: Option<String>,
    archetype_description: Option<String>,
    archetype_rarity: Option<String>,
    archetype_stats: Option<serde_json::Value>,
    archetype_image_url: Option<String>,
    archetype_model_url: Option<String>,
    archetype_is_available: Option<bool>,
    archetype_created_at: Option<DateTime<Utc>>,
    owner_id: Option<Uuid>,
    owner_name: Option<String>,
    owner_email: Option<String>,
}

impl DetailsRow {
    fn into_details(self) -> StoredCampaignDetails {
        let archetype = match (
            self.archetype_row_id,
            self.archetype_name,
            self.archetype_rarity,
            self.archetype_stats,
            self.archetype_is_available,
            self.archetype_created_at,
        ) {
            (
                Some(id),
                Some(name),
                Some(rarity),
                Some(stats),
                Some(is_available),
                Some(created_at),
            ) => Some(StoredArchetype {
                id: id.into(),
                name,
                description: self.archetype_description,
                rarity,
                stats,
                image_url: self.archetype_image_url,
                model_url: self.archetype_model_url,
                is_available,
                created_at,
            }),
            _ => None,
        };
        let owner = match (self.owner_id, self.owner_name, self.owner_email) {
            (Some(id), Some(name), Some(email)) => Some(OwnerSummary {
                id: id.into(),
                name,
                email,
            }),
            _ => None,
        };
        StoredCampaignDetails {
            campaign: self.campaign.into(),
            archetype,
            owner,
        }
    }
}

/// PostgreSQL-backed campaign store.
#[derive(Debug, Clone)]
pub struct PgCampaignRepository {
    pool: PgPool,
}

impl PgCampaignRepository {
    /// Creates a new `PgCampaignRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignRepository for PgCampaignRepository {
    async fn insert(&self, campaign: &StoredCampaign) -> Result<StoredCampaign, DomainError> {
        let row: CampaignRow = sqlx::query_as(INSERT)
            .bind(campaign.id.as_uuid())
            .bind(campaign.user_id.as_uuid())
            .bind(campaign.archetype_id.as_uuid())
            .bind(&campaign.campaign_name)
            .bind(&campaign.status)
            .bind(&campaign.progress)
            .bind(campaign.start_date)
            .bind(campaign.last_played_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or_infrastructure("insert campaign", &e, DUPLICATE_ACTIVE))?;
        Ok(row.into())
    }

    async fn find_owned(
        &self,
        owner: UserId,
        id: CampaignId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        let row: Option<CampaignRow> = sqlx::query_as(SELECT_OWNED)
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infrastructure("load campaign", &e))?;
        Ok(row.map(Into::into))
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        status: Option<&str>,
    ) -> Result<Vec<StoredCampaign>, DomainError> {
        let rows: Vec<CampaignRow> = sqlx::query_as(SELECT_BY_OWNER)
            .bind(owner.as_uuid())
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| infrastructure("list campaigns", &e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_active(
        &self,
        owner: UserId,
        archetype_id: ArchetypeId,
    ) -> Result<Option<StoredCampaign>, DomainError> {
        let row: Option<CampaignRow> = sqlx::query_as(SELECT_ACTIVE)
            .bind(owner.as_uuid())
            .bind(archetype_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infrastructure("find active campaign", &e))?;
        Ok(row.map(Into::into))
    }

    async fn save(&self, campaign: &StoredCampaign) -> Result<Option<StoredCampaign>, DomainError> {
        let row: Option<CampaignRow> = sqlx::query_as(UPDATE)
            .bind(campaign.id.as_uuid())
            .bind(&campaign.campaign_name)
            .bind(&campaign.status)
            .bind(&campaign.progress)
            .bind(campaign.last_played_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or_infrastructure("save campaign", &e, DUPLICATE_ACTIVE))?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: CampaignId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| infrastructure("delete campaign", &e))?;
        Ok(result.rows_affected())
    }

    async fn find_with_details(
        &self,
        id: CampaignId,
    ) -> Result<Option<StoredCampaignDetails>, DomainError> {
        let row: Option<DetailsRow> = sqlx::query_as(SELECT_WITH_DETAILS)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infrastructure("load campaign details", &e))?;
        Ok(row.map(DetailsRow::into_details))
    }
}
