use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CreateFabricParams, FabricsRepo, RepoError, UpdateFabricParams},
    domain::entities::FabricRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const SELECT_COLUMNS: &str = "id, slug, name, description, composition, weight_gsm, properties, \
     image_url, sort_order, active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct FabricRow {
    id: Uuid,
    slug: String,
    name: String,
    description: String,
    composition: String,
    weight_gsm: Option<i32>,
    properties: serde_json::Value,
    image_url: Option<String>,
    sort_order: i32,
    active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<FabricRow> for FabricRecord {
    fn from(row: FabricRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            composition: row.composition,
            weight_gsm: row.weight_gsm,
            properties: row.properties,
            image_url: row.image_url,
            sort_order: row.sort_order,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl FabricsRepo for PostgresRepositories {
    async fn list_fabrics(&self, include_inactive: bool) -> Result<Vec<FabricRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SELECT_COLUMNS} FROM fabrics WHERE 1=1"
        ));
        if !include_inactive {
            qb.push(" AND active = TRUE");
        }
        qb.push(" ORDER BY sort_order, name");

        let rows: Vec<FabricRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FabricRecord>, RepoError> {
        let row: Option<FabricRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM fabrics WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<FabricRecord>, RepoError> {
        let row: Option<FabricRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM fabrics WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn create_fabric(&self, params: CreateFabricParams) -> Result<FabricRecord, RepoError> {
        let row: FabricRow = sqlx::query_as(&format!(
            "INSERT INTO fabrics \
                 (slug, name, description, composition, weight_gsm, properties, image_url, \
                  sort_order, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&params.slug)
        .bind(&params.name)
        .bind(&params.description)
        .bind(&params.composition)
        .bind(params.weight_gsm)
        .bind(&params.properties)
        .bind(&params.image_url)
        .bind(params.sort_order)
        .bind(params.active)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_fabric(
        &self,
        id: Uuid,
        params: UpdateFabricParams,
    ) -> Result<Option<FabricRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE fabrics SET updated_at = now()");
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
        if let Some(composition) = params.composition.as_ref() {
            qb.push(", composition = ");
            qb.push_bind(composition);
        }
        if let Some(weight_gsm) = params.weight_gsm {
            qb.push(", weight_gsm = ");
            qb.push_bind(weight_gsm);
        }
        if let Some(properties) = params.properties.as_ref() {
            qb.push(", properties = ");
            qb.push_bind(properties);
        }
        if let Some(image_url) = params.image_url.as_ref() {
            qb.push(", image_url = ");
            qb.push_bind(image_url);
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

        let row: Option<FabricRow> = qb
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_fabric(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM fabrics WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
