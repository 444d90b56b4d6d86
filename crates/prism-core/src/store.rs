//! Expiring key-value store
//!
//! Holds short-lived entries (staged mint requests) until they are consumed
//! or expire. The clock is always passed in so expiry is deterministic.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ExpiringStore<K, V> {
    ttl: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K: Eq + Hash, V> ExpiringStore<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert or replace an entry, expiring `ttl` after `now`
    pub fn put(&mut self, key: K, value: V, now: DateTime<Utc>) {
        let expires_at = now + self.ttl;
        self.entries.insert(key, Entry { value, expires_at });
    }

    /// Remove and return a live entry. Expired entries are dropped, not returned.
    pub fn take(&mut self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entry = self.entries.remove(key)?;
        (entry.expires_at > now).then_some(entry.value)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
