//! Cache manager.

use super::backend::{CacheBackend, MemoryCache, NullCache};
use super::key::{CacheKey, CacheKeyGenerator};
use crate::metrics::GenerationMetrics;
use crate::types::DocumentKind;
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(3600),
            max_entries: 1000,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
}

/// Response cache in front of the orchestrator.
///
/// Wraps a [`CacheBackend`], counts hits and misses, and bumps the shared
/// [`GenerationMetrics`] cache-hit counter on every hit.
pub struct ResponseCache {
    config: CacheConfig,
    backend: Box<dyn CacheBackend>,
    keys: CacheKeyGenerator,
    stats: AtomicStats,
    metrics: Arc<GenerationMetrics>,
}

impl ResponseCache {
    /// Memory backend when enabled, null backend otherwise.
    pub fn new(config: CacheConfig, metrics: Arc<GenerationMetrics>) -> Self {
        let backend: Box<dyn CacheBackend> = if config.enabled {
            Box::new(MemoryCache::new(config.max_entries, config.ttl))
        } else {
            Box::new(NullCache::new())
        };
        Self::with_backend(config, backend, metrics)
    }

    pub fn with_backend(
        config: CacheConfig,
        backend: Box<dyn CacheBackend>,
        metrics: Arc<GenerationMetrics>,
    ) -> Self {
        Self {
            config,
            backend,
            keys: CacheKeyGenerator::new(),
            stats: AtomicStats::default(),
            metrics,
        }
    }

    pub fn with_key_generator(mut self, keys: CacheKeyGenerator) -> Self {
        self.keys = keys;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn fingerprint(&self, payload: &serde_json::Value, kind: DocumentKind, aux: &str) -> CacheKey {
        self.keys.generate(payload, kind, aux)
    }

    pub async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        if !self.config.enabled {
            return Ok(None);
        }
        match self.backend.get(key).await? {
            Some(content) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                self.metrics.record_cache_hit();
                debug!(key = %key, "cache hit");
                Ok(Some(content))
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    pub async fn set(&self, key: &CacheKey, content: &str) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }
        self.backend.set(key, content).await?;
        self.stats.sets.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub async fn delete(&self, key: &CacheKey) -> Result<bool> {
        self.backend.delete(key).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.backend.clear().await
    }

    pub async fn len(&self) -> Result<usize> {
        self.backend.len().await
    }

    /// Write, read back and remove a probe entry without touching stats.
    ///
    /// A full store is only read, so the probe never evicts a cached document.
    pub async fn self_test(&self) -> Result<bool> {
        let probe = CacheKey::new(format!("healthcheck_{}", uuid::Uuid::new_v4()));
        if self.backend.len().await? >= self.config.max_entries {
            return Ok(self.backend.get(&probe).await?.is_none());
        }
        self.backend.set(&probe, "test_value").await?;
        let read = self.backend.get(&probe).await?;
        self.backend.delete(&probe).await?;
        Ok(read.as_deref() == Some("test_value"))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            sets: self.stats.sets.load(Ordering::Relaxed),
            evictions: self.backend.evictions(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}
