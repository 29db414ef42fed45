// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounded, time-limited response cache.
//!
//! Maps a request identity (lowercased city + units, with a namespace prefix
//! for forecast requests) to the raw response payload and its fetch time. An
//! entry past its TTL is treated as absent and dropped on the read path; it
//! is never partially reused. A successful fetch always overwrites whatever
//! was stored under the key.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Upper bound on retained entries. Key cardinality is driven by the cities a
/// user actually searches, so the bound only matters for long-lived sessions.
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    fetched_at: Instant,
    last_used: u64,
}

/// In-memory LRU cache of provider responses.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<String, CacheEntry>,
    tick: u64,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: HashMap::new(),
            tick: 0,
        }
    }

    /// Fresh payload for `key`, or `None`. Expired entries are removed here
    /// rather than served stale.
    pub fn get(&mut self, key: &str, now: Instant) -> Option<Value> {
        let ttl = self.ttl;
        self.tick += 1;
        let tick = self.tick;

        match self.entries.get_mut(key) {
            Some(entry) if now.duration_since(entry.fetched_at) < ttl => {
                entry.last_used = tick;
                Some(entry.payload.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `payload` under `key`, unconditionally overwriting any prior
    /// entry. Evicts the least-recently-used entry when a new key would
    /// exceed capacity.
    pub fn insert(&mut self, key: String, payload: Value, now: Instant) {
        self.tick += 1;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                fetched_at: now,
                last_used: self.tick,
            },
        );
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shift an entry's fetch time into the past (tests only).
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &str, by: Duration) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.fetched_at -= by;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(600);

    #[test]
    fn fresh_entry_is_served() {
        let mut cache = ResponseCache::new(TTL, DEFAULT_CAPACITY);
        let now = Instant::now();

        cache.insert("london_metric".to_string(), json!({"temp": 15.0}), now);

        assert_eq!(cache.get("london_metric", now), Some(json!({"temp": 15.0})));
        assert_eq!(cache.get("paris_metric", now), None);
    }

    #[test]
    fn expired_entry_is_treated_as_absent() {
        let mut cache = ResponseCache::new(TTL, DEFAULT_CAPACITY);
        let now = Instant::now();

        cache.insert("london_metric".to_string(), json!(1), now);
        cache.backdate("london_metric", TTL + Duration::from_secs(1));

        assert_eq!(cache.get("london_metric", now), None);
        // The read path dropped it entirely.
        assert!(cache.is_empty());
    }

    #[test]
    fn entry_just_inside_ttl_is_still_fresh() {
        let mut cache = ResponseCache::new(TTL, DEFAULT_CAPACITY);
        let now = Instant::now();

        cache.insert("london_metric".to_string(), json!(1), now);
        cache.backdate("london_metric", TTL - Duration::from_secs(1));

        assert_eq!(cache.get("london_metric", now), Some(json!(1)));
    }

    #[test]
    fn insert_overwrites_prior_payload() {
        let mut cache = ResponseCache::new(TTL, DEFAULT_CAPACITY);
        let now = Instant::now();

        cache.insert("london_metric".to_string(), json!(1), now);
        cache.insert("london_metric".to_string(), json!(2), now);

        assert_eq!(cache.get("london_metric", now), Some(json!(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn eviction_drops_least_recently_used() {
        let mut cache = ResponseCache::new(TTL, 2);
        let now = Instant::now();

        cache.insert("a".to_string(), json!(1), now);
        cache.insert("b".to_string(), json!(2), now);
        // Touch "a" so "b" becomes the LRU entry.
        cache.get("a", now);
        cache.insert("c".to_string(), json!(3), now);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a", now), Some(json!(1)));
        assert_eq!(cache.get("b", now), None);
        assert_eq!(cache.get("c", now), Some(json!(3)));
    }

    #[test]
    fn overwrite_at_capacity_does_not_evict() {
        let mut cache = ResponseCache::new(TTL, 2);
        let now = Instant::now();

        cache.insert("a".to_string(), json!(1), now);
        cache.insert("b".to_string(), json!(2), now);
        cache.insert("a".to_string(), json!(3), now);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b", now), Some(json!(2)));
    }
}
