use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CatalogueImageParams, CatalogueQueryFilter, CatalogueRepo, ColorVariantParams,
        CreateCatalogueItemParams, RepoError, UpdateCatalogueItemParams,
    },
    domain::entities::{CatalogueImageRecord, CatalogueItemRecord, ColorVariantRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

const ITEM_COLUMNS: &str = "id, clothing_type_id, slug, name, description, moq, lead_time, \
     size_range, fabric_ids, features, specifications, customizable, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CatalogueItemRow {
    id: Uuid,
    clothing_type_id: Uuid,
    slug: String,
    name: String,
    description: String,
    moq: i32,
    lead_time: String,
    size_range: String,
    fabric_ids: Vec<Uuid>,
    features: Vec<String>,
    specifications: serde_json::Value,
    customizable: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl CatalogueItemRow {
    fn into_record(
        self,
        images: Vec<CatalogueImageRecord>,
        colors: Vec<ColorVariantRecord>,
    ) -> CatalogueItemRecord {
        CatalogueItemRecord {
            id: self.id,
            clothing_type_id: self.clothing_type_id,
            slug: self.slug,
            name: self.name,
            description: self.description,
            moq: self.moq,
            lead_time: self.lead_time,
            size_range: self.size_range,
            fabric_ids: self.fabric_ids,
            features: self.features,
            specifications: self.specifications,
            customizable: self.customizable,
            images,
            colors,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CatalogueImageRow {
    id: Uuid,
    catalogue_item_id: Uuid,
    url: String,
    alt_text: Option<String>,
    sort_order: i32,
    is_primary: bool,
}

impl From<CatalogueImageRow> for CatalogueImageRecord {
    fn from(row: CatalogueImageRow) -> Self {
        Self {
            id: row.id,
            catalogue_item_id: row.catalogue_item_id,
            url: row.url,
            alt_text: row.alt_text,
            sort_order: row.sort_order,
            is_primary: row.is_primary,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ColorVariantRow {
    id: Uuid,
    catalogue_item_id: Uuid,
    name: String,
    hex: String,
    front_image_url: Option<String>,
    back_image_url: Option<String>,
    side_image_url: Option<String>,
    sort_order: i32,
}

impl From<ColorVariantRow> for ColorVariantRecord {
    fn from(row: ColorVariantRow) -> Self {
        Self {
            id: row.id,
            catalogue_item_id: row.catalogue_item_id,
            name: row.name,
            hex: row.hex,
            front_image_url: row.front_image_url,
            back_image_url: row.back_image_url,
            side_image_url: row.side_image_url,
            sort_order: row.sort_order,
        }
    }
}

impl PostgresRepositories {
    /// Attach images and color variants to a batch of item rows with two
    /// grouped queries instead of one pair per item.
    async fn hydrate_items(
        &self,
        rows: Vec<CatalogueItemRow>,
    ) -> Result<Vec<CatalogueItemRecord>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let image_rows: Vec<CatalogueImageRow> = sqlx::query_as(
            "SELECT id, catalogue_item_id, url, alt_text, sort_order, is_primary \
             FROM catalogue_images WHERE catalogue_item_id = ANY($1) \
             ORDER BY sort_order, id",
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let color_rows: Vec<ColorVariantRow> = sqlx::query_as(
            "SELECT id, catalogue_item_id, name, hex, front_image_url, back_image_url, \
                    side_image_url, sort_order \
             FROM color_variants WHERE catalogue_item_id = ANY($1) \
             ORDER BY sort_order, id",
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let mut images_by_item: HashMap<Uuid, Vec<CatalogueImageRecord>> = HashMap::new();
        for row in image_rows {
            images_by_item
                .entry(row.catalogue_item_id)
                .or_default()
                .push(row.into());
        }
        let mut colors_by_item: HashMap<Uuid, Vec<ColorVariantRecord>> = HashMap::new();
        for row in color_rows {
            colors_by_item
                .entry(row.catalogue_item_id)
                .or_default()
                .push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let images = images_by_item.remove(&row.id).unwrap_or_default();
                let colors = colors_by_item.remove(&row.id).unwrap_or_default();
                row.into_record(images, colors)
            })
            .collect())
    }

    async fn hydrate_item(
        &self,
        row: Option<CatalogueItemRow>,
    ) -> Result<Option<CatalogueItemRecord>, RepoError> {
        match row {
            Some(row) => Ok(self.hydrate_items(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CatalogueRepo for PostgresRepositories {
    async fn list_catalogue_items(
        &self,
        filter: &CatalogueQueryFilter,
    ) -> Result<Vec<CatalogueItemRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ITEM_COLUMNS} FROM catalogue_items WHERE 1=1"
        ));
        if let Some(clothing_type_id) = filter.clothing_type_id {
            qb.push(" AND clothing_type_id = ");
            qb.push_bind(clothing_type_id);
        }
        if let Some(customizable) = filter.customizable {
            qb.push(" AND customizable = ");
            qb.push_bind(customizable);
        }
        qb.push(" ORDER BY name");

        let rows: Vec<CatalogueItemRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        self.hydrate_items(rows).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CatalogueItemRecord>, RepoError> {
        let row: Option<CatalogueItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM catalogue_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        self.hydrate_item(row).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CatalogueItemRecord>, RepoError> {
        let row: Option<CatalogueItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM catalogue_items WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        self.hydrate_item(row).await
    }

    async fn create_catalogue_item(
        &self,
        params: CreateCatalogueItemParams,
    ) -> Result<CatalogueItemRecord, RepoError> {
        let row: CatalogueItemRow = sqlx::query_as(&format!(
            "INSERT INTO catalogue_items \
                 (clothing_type_id, slug, name, description, moq, lead_time, size_range, \
                  fabric_ids, features, specifications, customizable) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(params.clothing_type_id)
        .bind(&params.slug)
        .bind(&params.name)
        .bind(&params.description)
        .bind(params.moq)
        .bind(&params.lead_time)
        .bind(&params.size_range)
        .bind(&params.fabric_ids)
        .bind(&params.features)
        .bind(&params.specifications)
        .bind(params.customizable)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into_record(Vec::new(), Vec::new()))
    }

    async fn update_catalogue_item(
        &self,
        id: Uuid,
        params: UpdateCatalogueItemParams,
    ) -> Result<Option<CatalogueItemRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE catalogue_items SET updated_at = now()");
        if let Some(clothing_type_id) = params.clothing_type_id {
            qb.push(", clothing_type_id = ");
            qb.push_bind(clothing_type_id);
        }
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
        if let Some(moq) = params.moq {
            qb.push(", moq = ");
            qb.push_bind(moq);
        }
        if let Some(lead_time) = params.lead_time.as_ref() {
            qb.push(", lead_time = ");
            qb.push_bind(lead_time);
        }
        if let Some(size_range) = params.size_range.as_ref() {
            qb.push(", size_range = ");
            qb.push_bind(size_range);
        }
        if let Some(fabric_ids) = params.fabric_ids.as_ref() {
            qb.push(", fabric_ids = ");
            qb.push_bind(fabric_ids);
        }
        if let Some(features) = params.features.as_ref() {
            qb.push(", features = ");
            qb.push_bind(features);
        }
        if let Some(specifications) = params.specifications.as_ref() {
            qb.push(", specifications = ");
            qb.push_bind(specifications);
        }
        if let Some(customizable) = params.customizable {
            qb.push(", customizable = ");
            qb.push_bind(customizable);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {ITEM_COLUMNS}"));

        let row: Option<CatalogueItemRow> = qb
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        self.hydrate_item(row).await
    }

    async fn delete_catalogue_item(&self, id: Uuid) -> Result<bool, RepoError> {
        // Side tables cascade on delete.
        let result = sqlx::query("DELETE FROM catalogue_items WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_images(
        &self,
        item_id: Uuid,
        images: Vec<CatalogueImageParams>,
    ) -> Result<Option<Vec<CatalogueImageRecord>>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM catalogue_items WHERE id = $1 FOR UPDATE")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        if exists.is_none() {
            return Ok(None);
        }

        sqlx::query("DELETE FROM catalogue_images WHERE catalogue_item_id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let mut stored = Vec::with_capacity(images.len());
        for image in &images {
            let row: CatalogueImageRow = sqlx::query_as(
                "INSERT INTO catalogue_images \
                     (catalogue_item_id, url, alt_text, sort_order, is_primary) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING id, catalogue_item_id, url, alt_text, sort_order, is_primary",
            )
            .bind(item_id)
            .bind(&image.url)
            .bind(&image.alt_text)
            .bind(image.sort_order)
            .bind(image.is_primary)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
            stored.push(row.into());
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(Some(stored))
    }

    async fn replace_colors(
        &self,
        item_id: Uuid,
        colors: Vec<ColorVariantParams>,
    ) -> Result<Option<Vec<ColorVariantRecord>>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM catalogue_items WHERE id = $1 FOR UPDATE")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        if exists.is_none() {
            return Ok(None);
        }

        sqlx::query("DELETE FROM color_variants WHERE catalogue_item_id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let mut stored = Vec::with_capacity(colors.len());
        for color in &colors {
            let row: ColorVariantRow = sqlx::query_as(
                "INSERT INTO color_variants \
                     (catalogue_item_id, name, hex, front_image_url, back_image_url, \
                      side_image_url, sort_order) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING id, catalogue_item_id, name, hex, front_image_url, back_image_url, \
                           side_image_url, sort_order",
            )
            .bind(item_id)
            .bind(&color.name)
            .bind(&color.hex)
            .bind(&color.front_image_url)
            .bind(&color.back_image_url)
            .bind(&color.side_image_url)
            .bind(color.sort_order)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
            stored.push(row.into());
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(Some(stored))
    }
}
