//! Cached read paths for the public catalogue surfaces.
//!
//! Every read consults the content cache first and stores what the database
//! returned. Misses are never cached, so an absent slug stays a database
//! round trip until the row exists.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::application::error::AppError;
use crate::application::repos::{
    CatalogueQueryFilter, CatalogueRepo, ClothingTypesRepo, FabricsRepo, FactoryPhotosRepo,
};
use crate::cache::ContentCache;
use crate::domain::entities::{
    CatalogueItemRecord, ClothingTypeRecord, FabricRecord, FactoryPhotoRecord,
};
use crate::domain::error::DomainError;
use crate::domain::lookup::LookupKey;

pub struct CatalogueReadService {
    clothing_types: Arc<dyn ClothingTypesRepo>,
    catalogue: Arc<dyn CatalogueRepo>,
    fabrics: Arc<dyn FabricsRepo>,
    factory_photos: Arc<dyn FactoryPhotosRepo>,
    cache: Arc<ContentCache>,
}

impl CatalogueReadService {
    pub fn new(
        clothing_types: Arc<dyn ClothingTypesRepo>,
        catalogue: Arc<dyn CatalogueRepo>,
        fabrics: Arc<dyn FabricsRepo>,
        factory_photos: Arc<dyn FactoryPhotosRepo>,
        cache: Arc<ContentCache>,
    ) -> Self {
        Self {
            clothing_types,
            catalogue,
            fabrics,
            factory_photos,
            cache,
        }
    }

    /// Active clothing types in sort order; backs site navigation.
    pub async fn navigation(&self) -> Result<Vec<ClothingTypeRecord>, AppError> {
        if let Some(cached) = self.cache.get_navigation() {
            return Ok(cached);
        }
        let types = self.clothing_types.list_clothing_types(false).await?;
        self.cache.set_navigation(types.clone());
        Ok(types)
    }

    pub async fn clothing_type(&self, key: &LookupKey) -> Result<ClothingTypeRecord, AppError> {
        let found = match key {
            LookupKey::Id(id) => self.clothing_types.find_by_id(*id).await?,
            LookupKey::Slug(slug) => self.clothing_types.find_by_slug(slug).await?,
        };
        found.ok_or_else(|| DomainError::not_found("clothing type").into())
    }

    pub async fn catalogue_items(
        &self,
        filter: &CatalogueQueryFilter,
    ) -> Result<Vec<CatalogueItemRecord>, AppError> {
        let key = list_cache_key(filter);
        if let Some(cached) = self.cache.get_catalogue_list(&key) {
            return Ok(cached);
        }
        let items = self.catalogue.list_catalogue_items(filter).await?;
        self.cache.set_catalogue_list(key, items.clone());
        Ok(items)
    }

    pub async fn catalogue_item(&self, key: &LookupKey) -> Result<CatalogueItemRecord, AppError> {
        if let LookupKey::Slug(slug) = key
            && let Some(cached) = self.cache.get_catalogue_by_slug(slug)
        {
            return Ok(cached);
        }
        let found = match key {
            LookupKey::Id(id) => self.catalogue.find_by_id(*id).await?,
            LookupKey::Slug(slug) => self.catalogue.find_by_slug(slug).await?,
        };
        let item = found.ok_or_else(|| DomainError::not_found("catalogue item"))?;
        self.cache.set_catalogue_by_slug(&item.slug, item.clone());
        Ok(item)
    }

    /// Active fabrics in sort order.
    pub async fn fabrics(&self) -> Result<Vec<FabricRecord>, AppError> {
        if let Some(cached) = self.cache.get_fabrics() {
            return Ok(cached);
        }
        let fabrics = self.fabrics.list_fabrics(false).await?;
        self.cache.set_fabrics(fabrics.clone());
        Ok(fabrics)
    }

    pub async fn fabric(&self, key: &LookupKey) -> Result<FabricRecord, AppError> {
        if let LookupKey::Slug(slug) = key
            && let Some(cached) = self.cache.get_fabric_by_slug(slug)
        {
            return Ok(cached);
        }
        let found = match key {
            LookupKey::Id(id) => self.fabrics.find_by_id(*id).await?,
            LookupKey::Slug(slug) => self.fabrics.find_by_slug(slug).await?,
        };
        let fabric = found.ok_or_else(|| DomainError::not_found("fabric"))?;
        self.cache.set_fabric_by_slug(&fabric.slug, fabric.clone());
        Ok(fabric)
    }

    /// Active factory photos, optionally narrowed to one category. The full
    /// active list is what gets cached; category filters run in memory.
    pub async fn factory_photos(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<FactoryPhotoRecord>, AppError> {
        let photos = match self.cache.get_factory_photos() {
            Some(cached) => cached,
            None => {
                let photos = self.factory_photos.list_factory_photos(false, None).await?;
                self.cache.set_factory_photos(photos.clone());
                photos
            }
        };
        Ok(match category {
            Some(category) => photos
                .into_iter()
                .filter(|photo| photo.category == category)
                .collect(),
            None => photos,
        })
    }
}

fn list_cache_key(filter: &CatalogueQueryFilter) -> String {
    let mut key = String::from("items");
    if let Some(id) = filter.clothing_type_id {
        let _ = write!(key, "|type:{id}");
    }
    if let Some(customizable) = filter.customizable {
        let _ = write!(key, "|custom:{customizable}");
    }
    key
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn list_cache_keys_distinguish_filters() {
        let unfiltered = list_cache_key(&CatalogueQueryFilter::default());
        let by_type = list_cache_key(&CatalogueQueryFilter {
            clothing_type_id: Some(Uuid::new_v4()),
            customizable: None,
        });
        let customizable = list_cache_key(&CatalogueQueryFilter {
            clothing_type_id: None,
            customizable: Some(true),
        });

        assert_eq!(unfiltered, "items");
        assert_ne!(by_type, unfiltered);
        assert_ne!(customizable, unfiltered);
        assert_ne!(by_type, customizable);
    }
}
