//! Cache backend implementations.

use super::key::CacheKey;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry {
    content: String,
    created_at: Instant,
}

impl CacheEntry {
    fn new(content: String) -> Self {
        Self {
            content,
            created_at: Instant::now(),
        }
    }

    /// Absolute TTL measured from insertion; reads never extend it.
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < ttl
    }
}

#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>>;
    async fn set(&self, key: &CacheKey, content: &str) -> Result<()>;
    async fn delete(&self, key: &CacheKey) -> Result<bool>;
    async fn clear(&self) -> Result<()>;
    async fn len(&self) -> Result<usize>;
    fn name(&self) -> &'static str;

    /// Entries dropped to make room, over the backend's lifetime.
    fn evictions(&self) -> u64 {
        0
    }
}

/// Bounded in-memory store with absolute TTL.
///
/// Expired entries are removed when read. At capacity, inserting a new key
/// evicts the single entry with the oldest creation instant.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    max_entries: usize,
    ttl: Duration,
    evictions: AtomicU64,
}

impl MemoryCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
            ttl,
            evictions: AtomicU64::new(0),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn evict_oldest(&self, entries: &mut HashMap<String, CacheEntry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, e)| e.created_at)
            .map(|(k, _)| k.clone());
        if let Some(k) = oldest {
            entries.remove(&k);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        match entries.get(&key.hash) {
            Some(entry) if entry.is_fresh(self.ttl, now) => Ok(Some(entry.content.clone())),
            Some(_) => {
                entries.remove(&key.hash);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &CacheKey, content: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(&key.hash) && entries.len() >= self.max_entries {
            self.evict_oldest(&mut entries);
        }
        entries.insert(key.hash.clone(), CacheEntry::new(content.to_string()));
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.entries.lock().await.remove(&key.hash).is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.lock().await.clear();
        Ok(())
    }

    /// Stored entries, expired ones included until they are read.
    async fn len(&self) -> Result<usize> {
        Ok(self.entries.lock().await.len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }

    fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

/// Stores nothing. Used when caching is disabled.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn get(&self, _: &CacheKey) -> Result<Option<String>> {
        Ok(None)
    }
    async fn set(&self, _: &CacheKey, _: &str) -> Result<()> {
        Ok(())
    }
    async fn delete(&self, _: &CacheKey) -> Result<bool> {
        Ok(false)
    }
    async fn clear(&self) -> Result<()> {
        Ok(())
    }
    async fn len(&self) -> Result<usize> {
        Ok(0)
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
