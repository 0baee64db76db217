//! Process-wide cache of resolved IANA timezone lookups.
//!
//! Parsing a zone name walks chrono-tz's name table; parsers built repeatedly
//! from configuration hit the same handful of names, so resolved zones are
//! kept in a small shared LRU cache. Once [`CAPACITY`] names are cached the
//! least recently used one is evicted.

use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock, PoisonError};

use chrono_tz::Tz;
use lru::LruCache;
use tracing::debug;

use crate::error::TemporalError;

/// Maximum number of cached zone names.
pub const CAPACITY: usize = 64;

static TIMEZONES: OnceLock<TimezoneCache> = OnceLock::new();

/// LRU cache of zone names to resolved zones.
pub(crate) struct TimezoneCache {
    entries: Mutex<LruCache<String, Tz>>,
}

impl TimezoneCache {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub(crate) fn resolve(&self, name: &str) -> Result<Tz, TemporalError> {
        let cached = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied();
        if let Some(tz) = cached {
            return Ok(tz);
        }

        let tz: Tz = name
            .parse()
            .map_err(|_| TemporalError::InvalidTimezone(format!("'{name}'")))?;

        let evicted = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.to_string(), tz);
        if let Some((old, _)) = evicted.filter(|(old, _)| old != name) {
            debug!(evicted = %old, "timezone cache full");
        }
        Ok(tz)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    fn contains(&self, name: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }
}

/// Resolve an IANA timezone name (e.g. `"Europe/Paris"`).
///
/// # Errors
///
/// Returns [`TemporalError::InvalidTimezone`] if the name is not a known zone.
pub fn resolve_timezone(name: &str) -> Result<Tz, TemporalError> {
    TIMEZONES
        .get_or_init(|| TimezoneCache::new(CAPACITY))
        .resolve(name)
}
