//! Outbound notification seam for new enquiries.
//!
//! Delivery is best effort: a failed notification is logged and counted but
//! never fails the enquiry that triggered it.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::types::EnquiryPriority;

#[derive(Debug, Error)]
#[error("notification delivery failed: {reason}")]
pub struct NotifyError {
    pub reason: String,
}

/// What an enquiry notification carries, independent of the channel.
#[derive(Debug, Clone)]
pub struct EnquiryNotification {
    pub enquiry_id: Uuid,
    pub kind: NotificationKind,
    pub customer_name: String,
    pub customer_email: String,
    pub quantity: i32,
    pub priority: EnquiryPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Enquiry,
    DesignEnquiry,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Enquiry => "enquiry",
            NotificationKind::DesignEnquiry => "design_enquiry",
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn enquiry_received(&self, notification: &EnquiryNotification)
    -> Result<(), NotifyError>;
}

/// Default channel: a structured log line. Deployments that wire a real
/// channel swap the implementation behind the trait.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn enquiry_received(
        &self,
        notification: &EnquiryNotification,
    ) -> Result<(), NotifyError> {
        info!(
            enquiry_id = %notification.enquiry_id,
            kind = notification.kind.as_str(),
            customer = %notification.customer_name,
            email = %notification.customer_email,
            quantity = notification.quantity,
            priority = notification.priority.as_str(),
            "New enquiry received"
        );
        Ok(())
    }
}
