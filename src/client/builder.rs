use crate::client::core::ModelOrchestrator;
use crate::client::policy::PolicyEngine;
use crate::config::ServiceConfig;
use crate::metrics::GenerationMetrics;
use crate::provider::ModelProvider;
use crate::tokens::CharacterEstimator;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`ModelOrchestrator`].
///
/// Defaults match [`ServiceConfig::default`]: `gpt-4o` falling back to
/// `gpt-4`, three attempts, 1 s base backoff, 90 s per attempt.
pub struct OrchestratorBuilder {
    provider: Arc<dyn ModelProvider>,
    primary_model: String,
    fallback_model: String,
    max_retries: u32,
    base_delay: Duration,
    attempt_timeout: Duration,
    metrics: Option<Arc<GenerationMetrics>>,
    analytics_enabled: bool,
}

impl OrchestratorBuilder {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        let defaults = ServiceConfig::default();
        let base_delay = defaults.backoff_base();
        let attempt_timeout = defaults.timeout();
        Self {
            provider,
            primary_model: defaults.model,
            fallback_model: defaults.fallback_model,
            max_retries: defaults.max_retries,
            base_delay,
            attempt_timeout,
            metrics: None,
            analytics_enabled: defaults.analytics_enabled,
        }
    }

    /// Take models, retry budget, timings and the analytics flag from `config`.
    pub fn config(mut self, config: &ServiceConfig) -> Self {
        self.primary_model = config.model.clone();
        self.fallback_model = config.fallback_model.clone();
        self.max_retries = config.max_retries;
        self.base_delay = config.backoff_base();
        self.attempt_timeout = config.timeout();
        self.analytics_enabled = config.analytics_enabled;
        self
    }

    pub fn primary_model(mut self, model: impl Into<String>) -> Self {
        self.primary_model = model.into();
        self
    }

    pub fn fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n.max(1);
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Share an existing metrics instance. A fresh one is created otherwise.
    pub fn metrics(mut self, metrics: Arc<GenerationMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn analytics_enabled(mut self, enabled: bool) -> Self {
        self.analytics_enabled = enabled;
        self
    }

    pub fn build(self) -> ModelOrchestrator {
        ModelOrchestrator {
            provider: self.provider,
            primary_model: self.primary_model,
            policy: PolicyEngine::new(self.max_retries, self.base_delay, self.fallback_model),
            attempt_timeout: self.attempt_timeout,
            metrics: self.metrics.unwrap_or_default(),
            analytics_enabled: self.analytics_enabled,
            estimator: CharacterEstimator::new(),
        }
    }
}
