use crate::provider::TokenUsage;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-model defaults applied when the caller does not override them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Model used for any name not in the table.
pub const DEFAULT_MODEL_ENTRY: &str = "gpt-4";

static MODEL_TABLE: Lazy<BTreeMap<String, ModelConfig>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "gpt-4o".to_string(),
            ModelConfig {
                max_tokens: 4000,
                temperature: 0.7,
            },
        ),
        (
            "gpt-4".to_string(),
            ModelConfig {
                max_tokens: 3000,
                temperature: 0.7,
            },
        ),
        (
            "gpt-3.5-turbo".to_string(),
            ModelConfig {
                max_tokens: 2500,
                temperature: 0.8,
            },
        ),
    ])
});

impl ModelConfig {
    pub fn lookup(model: &str) -> ModelConfig {
        MODEL_TABLE
            .get(model)
            .or_else(|| MODEL_TABLE.get(DEFAULT_MODEL_ENTRY))
            .copied()
            .unwrap_or(ModelConfig {
                max_tokens: 3000,
                temperature: 0.7,
            })
    }

    pub fn table() -> &'static BTreeMap<String, ModelConfig> {
        &MODEL_TABLE
    }
}

/// Caller overrides for a single orchestrated call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Start on this model instead of the primary.
    pub model: Option<String>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// What happened during one orchestrated call.
#[derive(Debug, Clone)]
pub struct CallStats {
    pub request_id: String,
    /// Model that produced the answer.
    pub model: String,
    pub attempts: u32,
    pub backoff_delays: Vec<Duration>,
    /// `Retry-After` values sent with rate limits. Logged only; the wait
    /// itself follows `backoff_delays`.
    pub retry_after_hints: Vec<Duration>,
    pub used_fallback: bool,
    pub duration: Duration,
    pub usage: TokenUsage,
    /// True when `usage` came from the local estimator.
    pub usage_estimated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_table() {
        assert_eq!(ModelConfig::lookup("gpt-4o").max_tokens, 4000);
        assert_eq!(ModelConfig::lookup("gpt-3.5-turbo").temperature, 0.8);
        assert_eq!(ModelConfig::lookup("claude-unknown"), ModelConfig::lookup("gpt-4"));
        assert_eq!(ModelConfig::table().len(), 3);
    }
}
