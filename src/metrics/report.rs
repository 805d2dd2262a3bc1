//! Analytics and health reports.

use super::MetricsSnapshot;
use crate::cache::CacheStats;
use crate::client::ModelConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything `DocumentService::analytics` reports.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceAnalytics {
    pub metrics: MetricsSnapshot,
    pub cache: CacheReport,
    pub models: ModelInfo,
    pub uptime: UptimeReport,
    pub analytics_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheReport {
    pub enabled: bool,
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// hits / (hits + misses), 0.0 before the first lookup.
    pub hit_rate: f64,
}

impl CacheReport {
    pub fn new(enabled: bool, size: usize, stats: &CacheStats) -> Self {
        Self {
            enabled,
            size,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            hit_rate: stats.hit_ratio(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub primary_model: String,
    pub fallback_model: String,
    pub model_configurations: BTreeMap<String, ModelConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UptimeReport {
    pub service_start: DateTime<Utc>,
    pub hours_operational: f64,
}

impl UptimeReport {
    pub fn since(service_start: DateTime<Utc>) -> Self {
        let elapsed = Utc::now().signed_duration_since(service_start);
        Self {
            service_start,
            hours_operational: elapsed.num_milliseconds().max(0) as f64 / 3_600_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Working,
    Failed,
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthComponents {
    pub api_connectivity: ComponentStatus,
    pub cache: ComponentStatus,
    pub analytics: ComponentStatus,
    pub primary_model: String,
    pub fallback_model: String,
}

/// Result of `DocumentService::health_check`.
///
/// An unhealthy report carries `error` and no components; a healthy one
/// carries components and a metrics snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<HealthComponents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn healthy(components: HealthComponents, metrics: MetricsSnapshot) -> Self {
        Self {
            status: HealthStatus::Healthy,
            components: Some(components),
            metrics: Some(metrics),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            components: None,
            metrics: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhealthy_report_serialization() {
        let report = HealthReport::unhealthy("API_ERROR: connection refused");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error"], "API_ERROR: connection refused");
        assert!(json.get("components").is_none());
        assert!(!report.is_healthy());
    }

    #[test]
    fn test_cache_report_uses_lookup_ratio() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        let report = CacheReport::new(true, 4, &stats);
        assert!((report.hit_rate - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_uptime_is_non_negative() {
        let report = UptimeReport::since(Utc::now());
        assert!(report.hours_operational >= 0.0);
    }
}
