use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{RepoError, SettingsRepo},
    domain::entities::{SiteSectionRecord, SiteSettingRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SiteSettingRow {
    key: String,
    value: serde_json::Value,
    updated_at: OffsetDateTime,
}

impl From<SiteSettingRow> for SiteSettingRecord {
    fn from(row: SiteSettingRow) -> Self {
        Self {
            key: row.key,
            value: row.value,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SiteSectionRow {
    key: String,
    value: serde_json::Value,
    visible: bool,
    sort_order: i32,
    updated_at: OffsetDateTime,
}

impl From<SiteSectionRow> for SiteSectionRecord {
    fn from(row: SiteSectionRow) -> Self {
        Self {
            key: row.key,
            value: row.value,
            visible: row.visible,
            sort_order: row.sort_order,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SettingsRepo for PostgresRepositories {
    async fn get_setting(&self, key: &str) -> Result<Option<SiteSettingRecord>, RepoError> {
        let row: Option<SiteSettingRow> =
            sqlx::query_as("SELECT key, value, updated_at FROM site_settings WHERE key = $1")
                .bind(key)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn upsert_setting(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<SiteSettingRecord, RepoError> {
        let row: SiteSettingRow = sqlx::query_as(
            "INSERT INTO site_settings (key, value, updated_at) \
             VALUES ($1, $2, now()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now() \
             RETURNING key, value, updated_at",
        )
        .bind(key)
        .bind(&value)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn list_sections(&self, visible_only: bool) -> Result<Vec<SiteSectionRecord>, RepoError> {
        let sql = if visible_only {
            "SELECT key, value, visible, sort_order, updated_at FROM site_sections \
             WHERE visible = TRUE ORDER BY sort_order, key"
        } else {
            "SELECT key, value, visible, sort_order, updated_at FROM site_sections \
             ORDER BY sort_order, key"
        };
        let rows: Vec<SiteSectionRow> = sqlx::query_as(sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_section(&self, key: &str) -> Result<Option<SiteSectionRecord>, RepoError> {
        let row: Option<SiteSectionRow> = sqlx::query_as(
            "SELECT key, value, visible, sort_order, updated_at FROM site_sections WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn upsert_section(
        &self,
        key: &str,
        value: serde_json::Value,
        visible: bool,
        sort_order: i32,
    ) -> Result<SiteSectionRecord, RepoError> {
        let row: SiteSectionRow = sqlx::query_as(
            "INSERT INTO site_sections (key, value, visible, sort_order, updated_at) \
             VALUES ($1, $2, $3, $4, now()) \
             ON CONFLICT (key) DO UPDATE SET \
                 value = EXCLUDED.value, \
                 visible = EXCLUDED.visible, \
                 sort_order = EXCLUDED.sort_order, \
                 updated_at = now() \
             RETURNING key, value, visible, sort_order, updated_at",
        )
        .bind(key)
        .bind(&value)
        .bind(visible)
        .bind(sort_order)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn delete_section(&self, key: &str) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM site_sections WHERE key = $1")
            .bind(key)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
