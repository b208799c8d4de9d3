use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CreateFactoryPhotoParams, FactoryPhotosRepo, RepoError, UpdateFactoryPhotoParams,
    },
    domain::entities::FactoryPhotoRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const SELECT_COLUMNS: &str =
    "id, title, description, image_url, category, sort_order, active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct FactoryPhotoRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    image_url: String,
    category: String,
    sort_order: i32,
    active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<FactoryPhotoRow> for FactoryPhotoRecord {
    fn from(row: FactoryPhotoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            category: row.category,
            sort_order: row.sort_order,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl FactoryPhotosRepo for PostgresRepositories {
    async fn list_factory_photos(
        &self,
        include_inactive: bool,
        category: Option<&str>,
    ) -> Result<Vec<FactoryPhotoRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SELECT_COLUMNS} FROM factory_photos WHERE 1=1"
        ));
        if !include_inactive {
            qb.push(" AND active = TRUE");
        }
        if let Some(category) = category {
            qb.push(" AND category = ");
            qb.push_bind(category);
        }
        qb.push(" ORDER BY sort_order, title");

        let rows: Vec<FactoryPhotoRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FactoryPhotoRecord>, RepoError> {
        let row: Option<FactoryPhotoRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM factory_photos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn create_factory_photo(
        &self,
        params: CreateFactoryPhotoParams,
    ) -> Result<FactoryPhotoRecord, RepoError> {
        let row: FactoryPhotoRow = sqlx::query_as(&format!(
            "INSERT INTO factory_photos \
                 (title, description, image_url, category, sort_order, active) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&params.title)
        .bind(&params.description)
        .bind(&params.image_url)
        .bind(&params.category)
        .bind(params.sort_order)
        .bind(params.active)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_factory_photo(
        &self,
        id: Uuid,
        params: UpdateFactoryPhotoParams,
    ) -> Result<Option<FactoryPhotoRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE factory_photos SET updated_at = now()");
        if let Some(title) = params.title.as_ref() {
            qb.push(", title = ");
            qb.push_bind(title);
        }
        if let Some(description) = params.description.as_ref() {
            qb.push(", description = ");
            qb.push_bind(description);
        }
        if let Some(image_url) = params.image_url.as_ref() {
            qb.push(", image_url = ");
            qb.push_bind(image_url);
        }
        if let Some(category) = params.category.as_ref() {
            qb.push(", category = ");
            qb.push_bind(category);
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

        let row: Option<FactoryPhotoRow> = qb
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_factory_photo(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM factory_photos WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
