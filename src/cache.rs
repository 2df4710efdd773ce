//! In-memory TTL+LRU cache for complete pipeline responses, keyed on
//! `(text, language, mode)`.
//!
//! This is consulted only by the HTTP surface, never by
//! [`crate::pipeline::Pipeline::process`] itself.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use sha2::{Digest, Sha256};

use crate::core::CheckResponse;

struct Entry {
    value: CheckResponse,
    inserted_at: Instant,
}

/// A thread-safe, TTL-bounded, capacity-bounded cache of check results.
pub struct Cache {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<String, Entry>>,
}

impl Cache {
    /// Build a cache with the given time-to-live and maximum entry count.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn key(text: &str, language: &str, mode: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(b"|");
        hasher.update(language.as_bytes());
        hasher.update(b"|");
        hasher.update(mode.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up a cached response. Returns `None` on a pure miss and on an
    /// expired entry, which is evicted as part of this lookup.
    #[must_use]
    pub fn get(&self, text: &str, language: &str, mode: &str) -> Option<CheckResponse> {
        let key = Self::key(text, language, mode);
        let mut entries = self.entries.lock().unwrap();

        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                Some(entry.value.clone())
            },
            Some(_) => {
                entries.remove(&key);
                None
            },
            None => None,
        }
    }

    /// Insert a response into the cache, evicting the oldest ~10% of
    /// entries first if the cache is already at capacity.
    pub fn set(&self, text: &str, language: &str, mode: &str, value: CheckResponse) {
        let key = Self::key(text, language, mode);
        let mut entries = self.entries.lock().unwrap();

        if entries.len() >= self.max_entries {
            evict_oldest(&mut entries);
        }

        entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Remove a specific entry, returning `true` if it was present.
    pub fn invalidate(&self, text: &str, language: &str, mode: &str) -> bool {
        let key = Self::key(text, language, mode);
        self.entries.lock().unwrap().remove(&key).is_some()
    }

    /// Remove every cached entry.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Number of entries currently cached, including any not yet found to
    /// be expired.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns `true` if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn evict_oldest(entries: &mut HashMap<String, Entry>) {
    if entries.is_empty() {
        return;
    }
    let mut keys: Vec<String> = entries.keys().cloned().collect();
    keys.sort_by_key(|k| entries[k].inserted_at);

    let evict_count = (keys.len() / 10).max(1);
    for key in keys.into_iter().take(evict_count) {
        entries.remove(&key);
    }
}
