//! Filato: a catalogue and enquiry backend for garment manufacturers.
//!
//! The crate is layered the same way the binary is deployed:
//!
//! - [`domain`] — entities, enums, and pure helpers (slugs, lookups).
//! - [`application`] — repository traits, services, and workflow rules.
//! - [`cache`] — the tagged in-process content cache and its trigger.
//! - [`infra`] — Postgres repositories, media storage, telemetry, and the
//!   axum JSON API.
//! - [`config`] — file/env/CLI configuration loading and validation.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
