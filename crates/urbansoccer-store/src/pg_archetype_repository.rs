//! `PostgreSQL` implementation of the `ArchetypeRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use urbansoccer_core::error::DomainError;
use urbansoccer_core::id::ArchetypeId;
use urbansoccer_core::repository::{ArchetypeFilter, ArchetypeRepository, StoredArchetype};

use crate::infrastructure;

macro_rules! columns {
    () => {
        "id, name, description, rarity, stats, image_url, model_url, is_available, created_at"
    };
}

const INSERT: &str = concat!(
    "INSERT INTO archetypes (",
    columns!(),
    ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING ",
    columns!()
);

const SELECT_BY_ID: &str = concat!("SELECT ", columns!(), " FROM archetypes WHERE id = $1");

const SELECT_ALL: &str = concat!("SELECT ", columns!(), " FROM archetypes ORDER BY name");

const SELECT_BY_AVAILABILITY: &str = concat!(
    "SELECT ",
    columns!(),
    " FROM archetypes WHERE is_available = $1 ORDER BY name"
);

const SELECT_AVAILABLE_BY_RARITY: &str = concat!(
    "SELECT ",
    columns!(),
    " FROM archetypes WHERE is_available AND rarity = $1 ORDER BY name"
);

const UPDATE: &str = concat!(
    "UPDATE archetypes \
     SET name = $2, description = $3, rarity = $4, stats = $5, \
         image_url = $6, model_url = $7, is_available = $8 \
     WHERE id = $1 RETURNING ",
    columns!()
);

#[derive(Debug, sqlx::FromRow)]
struct ArchetypeRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    rarity: String,
    stats: serde_json::Value,
    image_url: Option<String>,
    model_url: Option<String>,
    is_available: bool,
    created_at: DateTime<Utc>,
}

impl From<ArchetypeRow> for StoredArchetype {
    fn from(row: ArchetypeRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            description: row.description,
            rarity: row.rarity,
            stats: row.stats,
            image_url: row.image_url,
            model_url: row.model_url,
            is_available: row.is_available,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed archetype catalog. Every read goes to the database.
#[derive(Debug, Clone)]
pub struct PgArchetypeRepository {
    pool: PgPool,
}

impl PgArchetypeRepository {
    /// Creates a new `PgArchetypeRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArchetypeRepository for PgArchetypeRepository {
    async fn insert(&self, archetype: &StoredArchetype) -> Result<StoredArchetype, DomainError> {
        let row: ArchetypeRow = sqlx::query_as(INSERT)
            .bind(archetype.id.as_uuid())
            .bind(&archetype.name)
            .bind(&archetype.description)
            .bind(&archetype.rarity)
            .bind(&archetype.stats)
            .bind(&archetype.image_url)
            .bind(&archetype.model_url)
            .bind(archetype.is_available)
            .bind(archetype.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| infrastructure("insert archetype", &e))?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: ArchetypeId) -> Result<Option<StoredArchetype>, DomainError> {
        let row: Option<ArchetypeRow> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infrastructure("load archetype", &e))?;
        Ok(row.map(Into::into))
    }

    async fn list(&self, filter: &ArchetypeFilter) -> Result<Vec<StoredArchetype>, DomainError> {
        let query = match filter {
            ArchetypeFilter::All => sqlx::query_as(SELECT_ALL),
            ArchetypeFilter::Availability(available) => {
                sqlx::query_as(SELECT_BY_AVAILABILITY).bind(*available)
            }
            ArchetypeFilter::AvailableWithRarity(rarity) => {
                sqlx::query_as(SELECT_AVAILABLE_BY_RARITY).bind(rarity.as_str())
            }
        };
        let rows: Vec<ArchetypeRow> = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| infrastructure("list archetypes", &e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        archetype: &StoredArchetype,
    ) -> Result<Option<StoredArchetype>, DomainError> {
        let row: Option<ArchetypeRow> = sqlx::query_as(UPDATE)
            .bind(archetype.id.as_uuid())
            .bind(&archetype.name)
            .bind(&archetype.description)
            .bind(&archetype.rarity)
            .bind(&archetype.stats)
            .bind(&archetype.image_url)
            .bind(&archetype.model_url)
            .bind(archetype.is_available)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infrastructure("update archetype", &e))?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: ArchetypeId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM archetypes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| infrastructure("delete archetype", &e))?;
        Ok(result.rows_affected())
    }
}
