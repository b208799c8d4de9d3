//! HTTP surface: one JSON API serving both the public storefront reads and
//! the back-office CRUD routes.

pub mod api;
pub mod middleware;

pub use api::{ApiState, build_api_router};
