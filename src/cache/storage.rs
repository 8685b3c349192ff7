//! In-memory cache storage with per-entry expiration
//!
//! Entries live in a sharded concurrent map. Expired entries are never
//! returned but stay in place until overwritten or cleared.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use super::DEFAULT_EXPIRATION;

/// A cached response and the instant it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: Instant,
}

/// Entry counts reported by [`CacheStore::stats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

/// Key/value response cache with a fixed expiration window.
///
/// A disabled store (for `--no-cache`) never returns or keeps anything.
#[derive(Debug)]
pub struct CacheStore<V = String> {
    entries: DashMap<String, CacheEntry<V>>,
    expiration: Duration,
    enabled: bool,
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRATION)
    }
}

impl<V: Clone> CacheStore<V> {
    /// Create a store whose entries stay fresh for `expiration`
    pub fn new(expiration: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            expiration,
            enabled: true,
        }
    }

    /// Create a store that caches nothing
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(DEFAULT_EXPIRATION)
        }
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(test)]
    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Get a fresh entry. Absent and expired look the same to the caller.
    pub fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        if !self.enabled {
            return None;
        }

        let entry = self.entries.get(key)?;
        if self.is_expired(&entry, Instant::now()) {
            return None;
        }
        Some(entry.value().clone())
    }

    /// Store a value stamped with the current instant (last write wins)
    pub fn put(&self, key: &str, value: V) {
        self.put_at(key, value, Instant::now());
    }

    /// Store a value with an explicit timestamp
    pub fn put_at(&self, key: &str, value: V, stored_at: Instant) {
        if !self.enabled {
            return;
        }
        self.entries
            .insert(key.to_string(), CacheEntry { value, stored_at });
    }

    /// An entry is fresh while `now - stored_at <= expiration`
    pub fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) > self.expiration
    }

    /// Count valid and expired entries
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let total_entries = self.entries.len();
        let expired_entries = self
            .entries
            .iter()
            .filter(|entry| self.is_expired(entry.value(), now))
            .count();

        CacheStats {
            total_entries,
            valid_entries: total_entries - expired_entries,
            expired_entries,
        }
    }

    /// Remove every entry, returning how many were dropped
    #[cfg(test)]
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}
