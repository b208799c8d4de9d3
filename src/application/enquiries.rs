//! Enquiry workflow: snapshot resolution, derived priority, lifecycle
//! updates, and media cleanup for design enquiries.

use std::sync::Arc;

use metrics::counter;
use time::{Date, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::media::MediaPurge;
use crate::application::notify::{EnquiryNotification, NotificationKind, Notifier};
use crate::application::pagination::{PageRequest, Paged};
use crate::application::repos::{
    ClothingTypesRepo, CreateDesignEnquiryParams, CreateEnquiryParams, DesignEnquiriesRepo,
    EnquiriesRepo, EnquiryQueryFilter, EnquiryStats, FabricsRepo, UpdateEnquiryParams,
};
use crate::domain::entities::{DesignEnquiryRecord, EnquiryRecord};
use crate::domain::error::DomainError;
use crate::domain::types::EnquiryPriority;

const HIGH_PRIORITY_WINDOW_DAYS: i64 = 2;
const MEDIUM_PRIORITY_WINDOW_DAYS: i64 = 7;

/// Priority derived from how close a production deadline is. Past-due
/// deadlines count as the tightest window.
pub fn priority_for_deadline(deadline: Date, today: Date) -> EnquiryPriority {
    let days_left = (deadline - today).whole_days();
    if days_left <= HIGH_PRIORITY_WINDOW_DAYS {
        EnquiryPriority::High
    } else if days_left <= MEDIUM_PRIORITY_WINDOW_DAYS {
        EnquiryPriority::Medium
    } else {
        EnquiryPriority::Low
    }
}

/// A deadline in the request always decides the stored priority, overriding
/// any explicit priority sent alongside it. Clearing the deadline resets the
/// enquiry to medium.
fn apply_deadline_rule(mut params: UpdateEnquiryParams, today: Date) -> UpdateEnquiryParams {
    match params.deadline {
        Some(Some(deadline)) => params.priority = Some(priority_for_deadline(deadline, today)),
        Some(None) => params.priority = Some(EnquiryPriority::Medium),
        None => {}
    }
    params
}

fn resolve_create_priority(
    requested: Option<EnquiryPriority>,
    deadline: Option<Date>,
    today: Date,
) -> EnquiryPriority {
    match deadline {
        Some(deadline) => priority_for_deadline(deadline, today),
        None => requested.unwrap_or(EnquiryPriority::Medium),
    }
}

fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

// ---------------------------------------------------------------------------
// Catalogue enquiries
// ---------------------------------------------------------------------------

/// Incoming enquiry before snapshot and priority resolution.
#[derive(Debug, Clone)]
pub struct NewEnquiry {
    pub clothing_type_id: Option<Uuid>,
    pub fabric_id: Option<Uuid>,
    /// Free-text fallback when the customer picks an option the catalogue
    /// does not model. Ignored when the matching id is present.
    pub clothing_type_name: Option<String>,
    pub fabric_name: Option<String>,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub quantity: i32,
    pub is_sample_request: bool,
    pub size_range: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<EnquiryPriority>,
    pub deadline: Option<Date>,
}

pub struct EnquiryService {
    enquiries: Arc<dyn EnquiriesRepo>,
    clothing_types: Arc<dyn ClothingTypesRepo>,
    fabrics: Arc<dyn FabricsRepo>,
    notifier: Arc<dyn Notifier>,
}

impl EnquiryService {
    pub fn new(
        enquiries: Arc<dyn EnquiriesRepo>,
        clothing_types: Arc<dyn ClothingTypesRepo>,
        fabrics: Arc<dyn FabricsRepo>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            enquiries,
            clothing_types,
            fabrics,
            notifier,
        }
    }

    /// Create an enquiry, snapshotting the referenced clothing type and
    /// fabric names so later catalogue edits cannot rewrite enquiry history.
    pub async fn create(&self, input: NewEnquiry) -> Result<EnquiryRecord, AppError> {
        let clothing_type_name = match input.clothing_type_id {
            Some(id) => self
                .clothing_types
                .find_by_id(id)
                .await?
                .map(|record| record.name)
                .ok_or_else(|| DomainError::validation("unknown clothing type"))?,
            None => input
                .clothing_type_name
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| DomainError::validation("clothing type is required"))?,
        };
        let fabric_name = match input.fabric_id {
            Some(id) => self
                .fabrics
                .find_by_id(id)
                .await?
                .map(|record| record.name)
                .ok_or_else(|| DomainError::validation("unknown fabric"))?,
            None => input
                .fabric_name
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| DomainError::validation("fabric is required"))?,
        };

        let priority = resolve_create_priority(input.priority, input.deadline, today_utc());
        let record = self
            .enquiries
            .create_enquiry(CreateEnquiryParams {
                clothing_type_id: input.clothing_type_id,
                fabric_id: input.fabric_id,
                clothing_type_name,
                fabric_name,
                name: input.name,
                company: input.company,
                email: input.email,
                phone: input.phone,
                quantity: input.quantity,
                is_sample_request: input.is_sample_request,
                size_range: input.size_range,
                notes: input.notes,
                priority,
                deadline: input.deadline,
            })
            .await?;

        self.notify(NotificationKind::Enquiry, &record.id, &record.name, &record.email, record.quantity, record.priority)
            .await;
        Ok(record)
    }

    pub async fn list(
        &self,
        filter: &EnquiryQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<EnquiryRecord>, AppError> {
        Ok(self.enquiries.list_enquiries(filter, page).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<EnquiryRecord, AppError> {
        self.enquiries
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("enquiry").into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        params: UpdateEnquiryParams,
    ) -> Result<EnquiryRecord, AppError> {
        let params = apply_deadline_rule(params, today_utc());
        self.enquiries
            .update_enquiry(id, params)
            .await?
            .ok_or_else(|| DomainError::not_found("enquiry").into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.enquiries.delete_enquiry(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("enquiry").into())
        }
    }

    pub async fn delete_all(&self) -> Result<u64, AppError> {
        Ok(self.enquiries.delete_all_enquiries().await?)
    }

    pub async fn stats(&self) -> Result<EnquiryStats, AppError> {
        let counts = self.enquiries.status_counts().await?;
        Ok(EnquiryStats::from_counts(&counts))
    }

    async fn notify(
        &self,
        kind: NotificationKind,
        id: &Uuid,
        name: &str,
        email: &str,
        quantity: i32,
        priority: EnquiryPriority,
    ) {
        let notification = EnquiryNotification {
            enquiry_id: *id,
            kind,
            customer_name: name.to_string(),
            customer_email: email.to_string(),
            quantity,
            priority,
        };
        if let Err(err) = self.notifier.enquiry_received(&notification).await {
            counter!("filato_notify_failure_total", "kind" => kind.as_str()).increment(1);
            warn!(
                enquiry_id = %id,
                kind = kind.as_str(),
                error = %err,
                "Enquiry notification failed; enquiry stored anyway"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Design enquiries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewDesignEnquiry {
    pub fabric_id: Option<Uuid>,
    pub fabric_name: Option<String>,
    pub print_type: String,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub quantity: i32,
    pub front_image_url: String,
    pub back_image_url: String,
    pub side_image_url: String,
    pub logo_urls: Vec<String>,
    pub notes: Option<String>,
    pub priority: Option<EnquiryPriority>,
    pub deadline: Option<Date>,
}

pub struct DesignEnquiryService {
    design_enquiries: Arc<dyn DesignEnquiriesRepo>,
    fabrics: Arc<dyn FabricsRepo>,
    media: Arc<dyn MediaPurge>,
    notifier: Arc<dyn Notifier>,
}

impl DesignEnquiryService {
    pub fn new(
        design_enquiries: Arc<dyn DesignEnquiriesRepo>,
        fabrics: Arc<dyn FabricsRepo>,
        media: Arc<dyn MediaPurge>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            design_enquiries,
            fabrics,
            media,
            notifier,
        }
    }

    pub async fn create(&self, input: NewDesignEnquiry) -> Result<DesignEnquiryRecord, AppError> {
        let fabric_name = match input.fabric_id {
            Some(id) => self
                .fabrics
                .find_by_id(id)
                .await?
                .map(|record| record.name)
                .ok_or_else(|| DomainError::validation("unknown fabric"))?,
            None => input
                .fabric_name
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| DomainError::validation("fabric is required"))?,
        };

        let priority = resolve_create_priority(input.priority, input.deadline, today_utc());
        let record = self
            .design_enquiries
            .create_design_enquiry(CreateDesignEnquiryParams {
                fabric_id: input.fabric_id,
                fabric_name,
                print_type: input.print_type,
                name: input.name,
                company: input.company,
                email: input.email,
                phone: input.phone,
                quantity: input.quantity,
                front_image_url: input.front_image_url,
                back_image_url: input.back_image_url,
                side_image_url: input.side_image_url,
                logo_urls: input.logo_urls,
                notes: input.notes,
                priority,
                deadline: input.deadline,
            })
            .await?;

        let notification = EnquiryNotification {
            enquiry_id: record.id,
            kind: NotificationKind::DesignEnquiry,
            customer_name: record.name.clone(),
            customer_email: record.email.clone(),
            quantity: record.quantity,
            priority: record.priority,
        };
        if let Err(err) = self.notifier.enquiry_received(&notification).await {
            counter!("filato_notify_failure_total", "kind" => NotificationKind::DesignEnquiry.as_str())
                .increment(1);
            warn!(
                enquiry_id = %record.id,
                error = %err,
                "Design enquiry notification failed; enquiry stored anyway"
            );
        }
        Ok(record)
    }

    pub async fn list(
        &self,
        filter: &EnquiryQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<DesignEnquiryRecord>, AppError> {
        Ok(self.design_enquiries.list_design_enquiries(filter, page).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<DesignEnquiryRecord, AppError> {
        self.design_enquiries
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("design enquiry").into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        params: UpdateEnquiryParams,
    ) -> Result<DesignEnquiryRecord, AppError> {
        let params = apply_deadline_rule(params, today_utc());
        self.design_enquiries
            .update_design_enquiry(id, params)
            .await?
            .ok_or_else(|| DomainError::not_found("design enquiry").into())
    }

    /// Delete one design enquiry. Its stored mockup and logo images are
    /// purged first; a storage failure is logged but never blocks the row
    /// delete.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let record = self
            .design_enquiries
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("design enquiry"))?;
        self.purge_media(&record).await;
        if self.design_enquiries.delete_design_enquiry(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("design enquiry").into())
        }
    }

    /// Delete every design enquiry, purging each row's media beforehand.
    pub async fn delete_all(&self) -> Result<u64, AppError> {
        let records = self.design_enquiries.list_all_design_enquiries().await?;
        for record in &records {
            self.purge_media(record).await;
        }
        Ok(self.design_enquiries.delete_all_design_enquiries().await?)
    }

    pub async fn stats(&self) -> Result<EnquiryStats, AppError> {
        let counts = self.design_enquiries.status_counts().await?;
        Ok(EnquiryStats::from_counts(&counts))
    }

    async fn purge_media(&self, record: &DesignEnquiryRecord) {
        for url in record.image_urls() {
            if let Err(err) = self.media.delete_by_url(url).await {
                counter!("filato_media_purge_failure_total").increment(1);
                warn!(
                    enquiry_id = %record.id,
                    url,
                    error = %err,
                    "Media purge failed; continuing with enquiry delete"
                );
            }
        }
    }
}
