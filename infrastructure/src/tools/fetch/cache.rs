//! Bounded in-memory cache of fetched pages.
//!
//! Keyed by the requested URL. Entries older than the TTL are treated as
//! absent and removed when read. When an insert pushes the cache past its
//! capacity the oldest-inserted entry is evicted; reads do not refresh an
//! entry's position, and re-inserting a cached URL replaces its content and
//! timestamp but keeps its place in the eviction order.
//!
//! Check-and-set is not atomic across the network call: two concurrent
//! fetches of the same uncached URL both fetch, and the last insert wins.

use sleuth_domain::research::FetchedContent;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub const DEFAULT_CACHE_CAPACITY: usize = 100;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CachedContent {
    content: FetchedContent,
    stored_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CachedContent>,
    /// Keys in insertion order, oldest first
    order: VecDeque<String>,
}

impl CacheState {
    fn remove(&mut self, url: &str) {
        self.entries.remove(url);
        self.order.retain(|key| key != url);
    }
}

#[derive(Debug)]
pub struct ContentCache {
    capacity: usize,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}

impl ContentCache {
    /// A zero capacity is treated as 1.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh entry for `url`, if any.
    pub fn get(&self, url: &str) -> Option<FetchedContent> {
        self.get_at(url, Instant::now())
    }

    pub(crate) fn get_at(&self, url: &str, now: Instant) -> Option<FetchedContent> {
        let mut state = self.lock();
        let entry = state.entries.get(url)?;
        if now.saturating_duration_since(entry.stored_at) > self.ttl {
            state.remove(url);
            return None;
        }
        Some(entry.content.clone())
    }

    pub fn insert(&self, url: impl Into<String>, content: FetchedContent) {
        self.insert_at(url.into(), content, Instant::now());
    }

    pub(crate) fn insert_at(&self, url: String, content: FetchedContent, now: Instant) {
        let mut state = self.lock();
        let cached = CachedContent {
            content,
            stored_at: now,
        };

        if state.entries.insert(url.clone(), cached).is_none() {
            state.order.push_back(url);
        }

        while state.entries.len() > self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().entries.contains_key(url)
    }

    /// Number of stored entries, expired ones included until read.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }
}
