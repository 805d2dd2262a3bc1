//! 模型提供方模块：编排器与外部语言模型 API 之间的抽象边界。
//!
//! # Model Provider Module
//!
//! The orchestrator only talks to a [`ModelProvider`]. One attempt is one
//! call to [`ModelProvider::complete`]; retry, backoff, fallback and timeouts
//! all live above this seam.
//!
//! ## Implementations
//!
//! | Provider | Use |
//! |----------|-----|
//! | [`OpenAiProvider`] | OpenAI-compatible `/chat/completions` over HTTP |
//! | [`ScriptedProvider`] | In-process replies for tests and dry runs |
//!
//! ## Failure classes
//!
//! Every [`ProviderError`] maps to one [`FailureClass`], which is all the
//! retry policy looks at:
//!
//! | Error | Class |
//! |-------|-------|
//! | `RateLimited` | backoff and retry the same model |
//! | `Api`, `Timeout`, `Malformed`, `Transport` | provider failure, may switch to the fallback |
//! | `Other` | unexpected, retried at once |

pub mod mock;
pub mod openai;

pub use mock::ScriptedProvider;
pub use openai::OpenAiProvider;

use crate::types::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Presence and frequency penalty sent with every generation request.
pub const DEFAULT_PENALTY: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.7,
            max_tokens: 3000,
            presence_penalty: DEFAULT_PENALTY,
            frequency_penalty: DEFAULT_PENALTY,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Concatenated message text, used for token estimates.
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    /// `None` when the provider did not report usage.
    pub usage: Option<TokenUsage>,
    pub model: String,
}

impl Completion {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
            model: model.into(),
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}

/// How the retry policy treats a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    RateLimited,
    Provider,
    Unexpected,
}

impl ProviderError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        ProviderError::RateLimited {
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ProviderError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            ProviderError::RateLimited { .. } => FailureClass::RateLimited,
            ProviderError::Api { .. }
            | ProviderError::Timeout(_)
            | ProviderError::Malformed(_)
            | ProviderError::Transport(_) => FailureClass::Provider,
            ProviderError::Other(_) => FailureClass::Unexpected,
        }
    }

    /// Server-suggested wait, when a rate limit carried one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ProviderError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Stable name recorded as `error_kind` in service error details.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::Api { .. } => "api",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Malformed(_) => "malformed",
            ProviderError::Transport(_) => "transport",
            ProviderError::Other(_) => "other",
        }
    }
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// One attempt against the named model. No retries.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError>;

    fn name(&self) -> &'static str;
}
