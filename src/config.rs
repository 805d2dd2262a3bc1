//! 服务配置：默认值、YAML 加载、环境变量覆盖与校验。
//!
//! # Service Configuration
//!
//! [`ServiceConfig`] is injected into [`DocumentService`](crate::DocumentService).
//! Layering, later wins:
//!
//! 1. [`ServiceConfig::default`]
//! 2. a YAML file ([`ServiceConfig::from_file`]), missing keys keep defaults
//! 3. `DOCGEN_*` environment variables ([`ServiceConfig::apply_env`])
//!
//! | Field | Env var | Default |
//! |-------|---------|---------|
//! | `model` | `DOCGEN_MODEL` | `gpt-4o` |
//! | `fallback_model` | `DOCGEN_FALLBACK_MODEL` | `gpt-4` |
//! | `max_retries` | `DOCGEN_MAX_RETRIES` | 3 |
//! | `timeout_secs` | `DOCGEN_TIMEOUT_SECS` | 90 |
//! | `backoff_base_secs` | `DOCGEN_BACKOFF_BASE_SECS` | 1.0 (at most 3600) |
//! | `cache_enabled` | `DOCGEN_CACHE_ENABLED` | true |
//! | `cache_max_size` | `DOCGEN_CACHE_MAX_SIZE` | 1000 |
//! | `cache_ttl_secs` | `DOCGEN_CACHE_TTL_SECS` | 3600 |
//! | `analytics_enabled` | `DOCGEN_ANALYTICS_ENABLED` | true |
//! | `batch_concurrency` | `DOCGEN_BATCH_CONCURRENCY` | unbounded |

use crate::cache::CacheConfig;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Largest accepted backoff base; doubled per attempt from there.
const MAX_BACKOFF_BASE_SECS: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub model: String,
    pub fallback_model: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_base_secs: f64,
    pub cache_enabled: bool,
    pub cache_max_size: usize,
    pub cache_ttl_secs: u64,
    pub analytics_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_concurrency: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            fallback_model: "gpt-4".to_string(),
            max_retries: 3,
            timeout_secs: 90,
            backoff_base_secs: 1.0,
            cache_enabled: true,
            cache_max_size: 1000,
            cache_ttl_secs: 3600,
            analytics_enabled: true,
            batch_concurrency: None,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `DOCGEN_*` variables, then validated.
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                "invalid configuration YAML",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read configuration file {}", path.display()),
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any lookup; `lookup` returns the raw value of a variable.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DOCGEN_MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("DOCGEN_FALLBACK_MODEL") {
            self.fallback_model = v;
        }
        if let Some(v) = parse_var(&lookup, "DOCGEN_MAX_RETRIES")? {
            self.max_retries = v;
        }
        if let Some(v) = parse_var(&lookup, "DOCGEN_TIMEOUT_SECS")? {
            self.timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "DOCGEN_BACKOFF_BASE_SECS")? {
            self.backoff_base_secs = v;
        }
        if let Some(v) = parse_bool_var(&lookup, "DOCGEN_CACHE_ENABLED")? {
            self.cache_enabled = v;
        }
        if let Some(v) = parse_var(&lookup, "DOCGEN_CACHE_MAX_SIZE")? {
            self.cache_max_size = v;
        }
        if let Some(v) = parse_var(&lookup, "DOCGEN_CACHE_TTL_SECS")? {
            self.cache_ttl_secs = v;
        }
        if let Some(v) = parse_bool_var(&lookup, "DOCGEN_ANALYTICS_ENABLED")? {
            self.analytics_enabled = v;
        }
        if let Some(v) = parse_var(&lookup, "DOCGEN_BATCH_CONCURRENCY")? {
            self.batch_concurrency = Some(v);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }
        if self.fallback_model.trim().is_empty() {
            return Err(invalid("fallback_model", "must not be empty"));
        }
        if self.max_retries == 0 {
            return Err(invalid("max_retries", "must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than 0"));
        }
        if !self.backoff_base_secs.is_finite() || self.backoff_base_secs < 0.0 {
            return Err(invalid("backoff_base_secs", "must be a non-negative number"));
        }
        if self.backoff_base_secs > MAX_BACKOFF_BASE_SECS {
            return Err(invalid("backoff_base_secs", "must not exceed 3600 seconds"));
        }
        if self.cache_enabled && self.cache_max_size == 0 {
            return Err(invalid("cache_max_size", "must be at least 1 when the cache is enabled"));
        }
        if self.cache_enabled && self.cache_ttl_secs == 0 {
            return Err(invalid("cache_ttl_secs", "must be greater than 0 when the cache is enabled"));
        }
        if self.batch_concurrency == Some(0) {
            return Err(invalid("batch_concurrency", "must be at least 1"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::try_from_secs_f64(self.backoff_base_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_enabled(self.cache_enabled)
            .with_ttl(Duration::from_secs(self.cache_ttl_secs))
            .with_max_entries(self.cache_max_size)
    }
}

fn invalid(field: &str, details: &str) -> Error {
    Error::configuration_with_context(
        format!("invalid configuration value for '{}'", field),
        ErrorContext::new()
            .with_field_path(format!("config.{}", field))
            .with_details(details)
            .with_source("config_loader"),
    )
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            Error::configuration_with_context(
                format!("cannot parse environment variable {}", name),
                ErrorContext::new()
                    .with_field_path(name)
                    .with_details(format!("got '{}'", raw))
                    .with_source("config_loader"),
            )
        }),
    }
}

fn parse_bool_var<F>(lookup: &F, name: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|v| v.trim().to_lowercase()) {
        None => Ok(None),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::configuration_with_context(
                format!("cannot parse environment variable {}", name),
                ErrorContext::new()
                    .with_field_path(name)
                    .with_details(format!("expected a boolean, got '{}'", v))
                    .with_source("config_loader"),
            )),
        },
    }
}
