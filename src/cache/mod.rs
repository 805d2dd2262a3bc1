//! 响应缓存模块：以请求指纹为键缓存生成的文档，减少重复的模型调用。
//!
//! # Response Caching Module
//!
//! Generated documents are cached under a fingerprint of every caller-visible
//! input, so an identical request is answered without calling the model.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseCache`] | Front door used by the generators, with statistics |
//! | [`CacheConfig`] | Enabled flag, TTL and capacity |
//! | [`CacheBackend`] | Trait for storage backends |
//! | [`MemoryCache`] | Bounded in-memory store, oldest-insert eviction |
//! | [`NullCache`] | No-op backend used when caching is disabled |
//! | [`CacheKey`] | SHA-256 fingerprint of canonical JSON |
//!
//! ## Expiry
//!
//! TTL is absolute: an entry created at `t` is served while `now - t < ttl`
//! and removed on the first read after that. Reading an entry never
//! refreshes it.
//!
//! ## Example
//!
//! ```rust
//! use docgen_core::cache::{fingerprint, CacheConfig, ResponseCache};
//! use docgen_core::metrics::GenerationMetrics;
//! use docgen_core::types::DocumentKind;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let config = CacheConfig::new().with_ttl(Duration::from_secs(3600));
//! let cache = ResponseCache::new(config, Arc::new(GenerationMetrics::new()));
//!
//! let key = fingerprint(&serde_json::json!({"role": "Engineer"}), DocumentKind::Resume, "");
//! cache.set(&key, "generated text").await.unwrap();
//! assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("generated text"));
//! # });
//! ```

mod backend;
mod key;
mod manager;

pub use backend::{CacheBackend, MemoryCache, NullCache};
pub use key::{canonical_json, fingerprint, CacheKey, CacheKeyGenerator};
pub use manager::{CacheConfig, CacheStats, ResponseCache};
