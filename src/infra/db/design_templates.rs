use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CreateDesignTemplateParams, DesignTemplatesRepo, RepoError, UpdateDesignTemplateParams,
    },
    domain::entities::DesignTemplateRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const SELECT_COLUMNS: &str = "id, name, hex, front_image_url, back_image_url, side_image_url, \
     active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct DesignTemplateRow {
    id: Uuid,
    name: String,
    hex: String,
    front_image_url: String,
    back_image_url: String,
    side_image_url: String,
    active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<DesignTemplateRow> for DesignTemplateRecord {
    fn from(row: DesignTemplateRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            hex: row.hex,
            front_image_url: row.front_image_url,
            back_image_url: row.back_image_url,
            side_image_url: row.side_image_url,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl DesignTemplatesRepo for PostgresRepositories {
    async fn list_design_templates(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<DesignTemplateRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SELECT_COLUMNS} FROM design_templates WHERE 1=1"
        ));
        if !include_inactive {
            qb.push(" AND active = TRUE");
        }
        qb.push(" ORDER BY name");

        let rows: Vec<DesignTemplateRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DesignTemplateRecord>, RepoError> {
        let row: Option<DesignTemplateRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM design_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn create_design_template(
        &self,
        params: CreateDesignTemplateParams,
    ) -> Result<DesignTemplateRecord, RepoError> {
        let row: DesignTemplateRow = sqlx::query_as(&format!(
            "INSERT INTO design_templates \
                 (name, hex, front_image_url, back_image_url, side_image_url, active) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&params.name)
        .bind(&params.hex)
        .bind(&params.front_image_url)
        .bind(&params.back_image_url)
        .bind(&params.side_image_url)
        .bind(params.active)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_design_template(
        &self,
        id: Uuid,
        params: UpdateDesignTemplateParams,
    ) -> Result<Option<DesignTemplateRecord>, RepoError> {
        let mut qb =
            QueryBuilder::<Postgres>::new("UPDATE design_templates SET updated_at = now()");
        if let Some(name) = params.name.as_ref() {
            qb.push(", name = ");
            qb.push_bind(name);
        }
        if let Some(hex) = params.hex.as_ref() {
            qb.push(", hex = ");
            qb.push_bind(hex);
        }
        if let Some(front_image_url) = params.front_image_url.as_ref() {
            qb.push(", front_image_url = ");
            qb.push_bind(front_image_url);
        }
        if let Some(back_image_url) = params.back_image_url.as_ref() {
            qb.push(", back_image_url = ");
            qb.push_bind(back_image_url);
        }
        if let Some(side_image_url) = params.side_image_url.as_ref() {
            qb.push(", side_image_url = ");
            qb.push_bind(side_image_url);
        }
        if let Some(active) = params.active {
            qb.push(", active = ");
            qb.push_bind(active);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {SELECT_COLUMNS}"));

        let row: Option<DesignTemplateRow> = qb
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_design_template(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM design_templates WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
