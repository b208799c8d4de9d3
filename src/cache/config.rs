use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_REVALIDATE_SECS: u64 = 300;
const DEFAULT_ENTRY_LIMIT: usize = 256;

/// Cache behavior knobs resolved from deployment settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Entries older than this are treated as misses and recomputed.
    pub revalidate_after: Duration,
    /// Per-family LRU capacity for keyed entries (slugs, setting keys).
    pub entry_limit: usize,
}

impl CacheConfig {
    pub fn entry_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.entry_limit)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_ENTRY_LIMIT).expect("non-zero default"))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            revalidate_after: Duration::from_secs(DEFAULT_REVALIDATE_SECS),
            entry_limit: DEFAULT_ENTRY_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            revalidate_after: Duration::from_secs(settings.revalidate_seconds.get()),
            entry_limit: settings.entry_limit.get(),
        }
    }
}
