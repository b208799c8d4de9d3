//! Shared domain enumerations aligned with persisted database enums.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "enquiry_status", rename_all = "snake_case")]
pub enum EnquiryStatus {
    Pending,
    Contacted,
    Quoted,
    Closed,
}

impl EnquiryStatus {
    pub const ALL: [EnquiryStatus; 4] = [
        EnquiryStatus::Pending,
        EnquiryStatus::Contacted,
        EnquiryStatus::Quoted,
        EnquiryStatus::Closed,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "enquiry_priority", rename_all = "snake_case")]
pub enum EnquiryPriority {
    Low,
    Medium,
    High,
}

impl EnquiryPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            EnquiryPriority::Low => "low",
            EnquiryPriority::Medium => "medium",
            EnquiryPriority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "review_status", rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}
