//! Application layer: repository seams, workflows, and cached read services
//! sitting between the HTTP surface and persistence.

pub mod catalogue;
pub mod content;
pub mod enquiries;
pub mod error;
pub mod media;
pub mod notify;
pub mod pagination;
pub mod repos;
pub mod reviews;
