use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        ClothingTypesRepo, CreateClothingTypeParams, RepoError, UpdateClothingTypeParams,
    },
    domain::entities::ClothingTypeRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const SELECT_COLUMNS: &str = "id, slug, name, description, image_url, default_moq, lead_time, \
     size_range, sort_order, active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ClothingTypeRow {
    id: Uuid,
    slug: String,
    name: String,
    description: String,
    image_url: Option<String>,
    default_moq: i32,
    lead_time: String,
    size_range: String,
    sort_order: i32,
    active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ClothingTypeRow> for ClothingTypeRecord {
    fn from(row: ClothingTypeRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            default_moq: row.default_moq,
            lead_time: row.lead_time,
            size_range: row.size_range,
            sort_order: row.sort_order,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ClothingTypesRepo for PostgresRepositories {
    async fn list_clothing_types(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<ClothingTypeRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SELECT_COLUMNS} FROM clothing_types WHERE 1=1"
        ));
        if !include_inactive {
            qb.push(" AND active = TRUE");
        }
        qb.push(" ORDER BY sort_order, name");

        let rows: Vec<ClothingTypeRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ClothingTypeRecord>, RepoError> {
        let row: Option<ClothingTypeRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM clothing_types WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ClothingTypeRecord>, RepoError> {
        let row: Option<ClothingTypeRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM clothing_types WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn create_clothing_type(
        &self,
        params: CreateClothingTypeParams,
    ) -> Result<ClothingTypeRecord, RepoError> {
        let row: ClothingTypeRow = sqlx::query_as(&format!(
            "INSERT INTO clothing_types \
                 (slug, name, description, image_url, default_moq, lead_time, size_range, \
                  sort_order, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&params.slug)
        .bind(&params.name)
        .bind(&params.description)
        .bind(&params.image_url)
        .bind(params.default_moq)
        .bind(&params.lead_time)
        .bind(&params.size_range)
        .bind(params.sort_order)
        .bind(params.active)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_clothing_type(
        &self,
        id: Uuid,
        params: UpdateClothingTypeParams,
    ) -> Result<Option<ClothingTypeRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE clothing_types SET updated_at = now()");
        if let Some(name) = params.name.as_ref() {
            qb.push(", name = ");
            qb.push_bind(name);
        }
        if let Some(slug) = params.slug.as_ref() {
            qb.push(", slug = ");
            qb.push_bind(slug);
        }
        if let Some(description) = params.description.as_ref() {
            qb.push(", description = ");
            qb.push_bind(description);
        }
        if let Some(image_url) = params.image_url.as_ref() {
            qb.push(", image_url = ");
            qb.push_bind(image_url);
        }
        if let Some(default_moq) = params.default_moq {
            qb.push(", default_moq = ");
            qb.push_bind(default_moq);
        }
        if let Some(lead_time) = params.lead_time.as_ref() {
            qb.push(", lead_time = ");
            qb.push_bind(lead_time);
        }
        if let Some(size_range) = params.size_range.as_ref() {
            qb.push(", size_range = ");
            qb.push_bind(size_range);
        }
        if let Some(sort_order) = params.sort_order {
            qb.push(", sort_order = ");
            qb.push_bind(sort_order);
        }
        if let Some(active) = params.active {
            qb.push(", active = ");
            qb.push_bind(active);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {SELECT_COLUMNS}"));

        let row: Option<ClothingTypeRow> = qb
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_clothing_type(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM clothing_types WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
