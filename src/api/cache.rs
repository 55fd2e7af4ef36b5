//! TTL response cache.
//!
//! Entries are written whole on a successful response and never mutated in
//! place. Expiry is checked lazily at read time; an expired entry is removed
//! by the read that discovers it. There is no background sweep.

use dashmap::DashMap;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

use super::quota::QuotaSnapshot;

/// A cached successful response plus the quota observed when it was fetched
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Value,
    pub expires_at: Instant,
    pub quota: QuotaSnapshot,
}

/// In-memory response cache keyed by endpoint + serialized query
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unexpired entry for the key, or nothing. Removes the entry if the read
    /// finds it expired.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.get(key)?.clone();
        if entry.expires_at <= Instant::now() {
            drop(self.entries.remove(key));
            return None;
        }
        Some(entry)
    }

    pub fn put(&self, key: String, data: Value, ttl: Duration, quota: QuotaSnapshot) {
        self.entries.insert(
            key,
            CacheEntry {
                data,
                expires_at: Instant::now() + ttl,
                quota,
            },
        );
    }

    /// Drop all entries unconditionally
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
