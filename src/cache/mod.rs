//! Filato cache system.
//!
//! Wraps the hot public read paths (navigation data, catalogue and fabric
//! lookups, factory gallery, public reviews, settings keys) behind an
//! in-process store whose entries are grouped under invalidation tags.
//!
//! Entries are time-bounded by a fixed revalidation interval AND explicitly
//! invalidated by tag the moment any mutation touches the entity family.
//! Mutating handlers call [`CacheTrigger`] synchronously before responding.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! revalidate_seconds = 300
//! entry_limit = 256
//! ```

mod config;
mod lock;
mod store;
mod tags;
mod trigger;

pub use config::CacheConfig;
pub use store::ContentCache;
pub use tags::CacheTag;
pub use trigger::CacheTrigger;
