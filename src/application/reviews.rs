//! Review intake and the cached public review feed.

use std::sync::Arc;

use crate::application::error::AppError;
use crate::application::repos::{CreateReviewParams, ReviewsRepo};
use crate::cache::ContentCache;
use crate::domain::entities::ReviewRecord;

pub struct ReviewService {
    reviews: Arc<dyn ReviewsRepo>,
    cache: Arc<ContentCache>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewsRepo>, cache: Arc<ContentCache>) -> Self {
        Self { reviews, cache }
    }

    /// Approved-and-visible reviews for public pages, newest first.
    pub async fn public_reviews(&self) -> Result<Vec<ReviewRecord>, AppError> {
        if let Some(cached) = self.cache.get_public_reviews() {
            return Ok(cached);
        }
        let reviews = self.reviews.list_public_reviews().await?;
        self.cache.set_public_reviews(reviews.clone());
        Ok(reviews)
    }

    /// Store a customer submission. New reviews start pending and stay off
    /// public pages until moderated.
    pub async fn submit(&self, params: CreateReviewParams) -> Result<ReviewRecord, AppError> {
        Ok(self.reviews.create_review(params).await?)
    }
}
