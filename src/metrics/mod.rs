//! 指标模块：服务实例拥有的生成指标，以及分析报告与健康检查报告。
//!
//! # Metrics Module
//!
//! [`GenerationMetrics`] is owned by one [`DocumentService`](crate::DocumentService)
//! and shared through `Arc` with the orchestrator and the response cache.
//! Counters are atomics, so recording never takes a lock.
//!
//! | Counter | Incremented by |
//! |---------|----------------|
//! | `api_calls` | every provider attempt, successful or not |
//! | `tokens_used` | successful attempts only |
//! | `generation_time` | successful attempts only |
//! | `cache_hits` | cache lookups that returned content |
//!
//! The [`report`] submodule holds the serializable analytics and health
//! reports built from a [`MetricsSnapshot`].

pub mod report;

pub use report::{
    CacheReport, ComponentStatus, HealthComponents, HealthReport, HealthStatus, ModelInfo,
    ServiceAnalytics, UptimeReport,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct GenerationMetrics {
    tokens_used: AtomicU64,
    generation_micros: AtomicU64,
    api_calls: AtomicU64,
    cache_hits: AtomicU64,
    started_at: DateTime<Utc>,
}

impl Default for GenerationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self {
            tokens_used: AtomicU64::new(0),
            generation_micros: AtomicU64::new(0),
            api_calls: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, tokens: u64, elapsed: Duration) {
        self.tokens_used.fetch_add(tokens, Ordering::Relaxed);
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.generation_micros.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn api_calls(&self) -> u64 {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn tokens_used(&self) -> u64 {
        self.tokens_used.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn generation_time(&self) -> Duration {
        Duration::from_micros(self.generation_micros.load(Ordering::Relaxed))
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let api_calls = self.api_calls();
        let generation_time_secs = self.generation_time().as_secs_f64();
        MetricsSnapshot {
            tokens_used: self.tokens_used(),
            generation_time_secs,
            api_calls,
            cache_hits: self.cache_hits(),
            average_response_secs: generation_time_secs / api_calls.max(1) as f64,
            started_at: self.started_at,
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub tokens_used: u64,
    pub generation_time_secs: f64,
    pub api_calls: u64,
    pub cache_hits: u64,
    /// Generation time divided by API calls (failed attempts included).
    pub average_response_secs: f64,
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_attempts_count_calls_only() {
        let m = GenerationMetrics::new();
        m.record_api_call();
        m.record_api_call();
        m.record_success(120, Duration::from_millis(1500));
        let snap = m.snapshot();
        assert_eq!(snap.api_calls, 2);
        assert_eq!(snap.tokens_used, 120);
        assert!((snap.generation_time_secs - 1.5).abs() < 1e-9);
        assert!((snap.average_response_secs - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_empty_snapshot_has_no_division_by_zero() {
        let snap = GenerationMetrics::new().snapshot();
        assert_eq!(snap.api_calls, 0);
        assert_eq!(snap.average_response_secs, 0.0);
    }

    #[test]
    fn test_cache_hits_are_independent_of_calls() {
        let m = GenerationMetrics::new();
        m.record_cache_hit();
        m.record_cache_hit();
        assert_eq!(m.cache_hits(), 2);
        assert_eq!(m.api_calls(), 0);
    }
}
