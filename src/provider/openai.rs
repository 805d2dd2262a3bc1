use super::{Completion, CompletionRequest, ModelProvider, ProviderError, TokenUsage};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use keyring::Entry;
use reqwest::header::HeaderMap;
use reqwest::{Proxy, StatusCode};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completions provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        // Outer bound only; attempts are timed by the orchestrator.
        let timeout_secs = env::var("DOCGEN_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(300);

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(
                env::var("DOCGEN_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("DOCGEN_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                "failed to build HTTP client",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("openai_provider"),
            )
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Key from the keyring, then `OPENAI_API_KEY`; base URL from
    /// `OPENAI_BASE_URL` when set.
    pub fn from_env() -> Result<Self> {
        let api_key = Self::get_api_key().ok_or_else(|| {
            Error::configuration_with_context(
                "no OpenAI API key found",
                ErrorContext::new()
                    .with_field_path("OPENAI_API_KEY")
                    .with_details("store it in the keyring under docgen/openai or set OPENAI_API_KEY")
                    .with_source("openai_provider"),
            )
        })?;
        let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, base_url)
    }

    fn get_api_key() -> Option<String> {
        if let Ok(entry) = Entry::new("docgen", "openai") {
            if let Ok(key) = entry.get_password() {
                if !key.trim().is_empty() {
                    return Some(key);
                }
            }
        }
        env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn retry_after(headers: &HeaderMap) -> Option<Duration> {
        let raw = headers.get("retry-after")?.to_str().ok()?;
        let secs: u64 = raw.trim().parse().ok()?;
        Some(Duration::from_secs(secs))
    }

    /// Pull `error.message` out of an OpenAI error body, or fall back to the raw body.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.message)
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<Completion, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let start = std::time::Instant::now();

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = Self::retry_after(resp.headers());
            let body = resp.text().await.unwrap_or_default();
            let message = Self::error_message(&body);

            info!(
                http_status = status.as_u16(),
                model = request.model.as_str(),
                duration_ms = start.elapsed().as_millis(),
                "chat completion request failed"
            );

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited { message, retry_after });
            }
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::Malformed("response has no message content".into()))?;

        debug!(
            model = request.model.as_str(),
            duration_ms = start.elapsed().as_millis(),
            "chat completion received"
        );

        Ok(Completion {
            content,
            usage: parsed.usage,
            model: parsed.model.unwrap_or_else(|| request.model.clone()),
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(OpenAiProvider::error_message(body), "Incorrect API key provided");
        assert_eq!(OpenAiProvider::error_message("upstream reset\n"), "upstream reset");
    }

    #[test]
    fn test_retry_after_seconds_only() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", "7".parse().unwrap());
        assert_eq!(OpenAiProvider::retry_after(&headers), Some(Duration::from_secs(7)));
        headers.insert("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(OpenAiProvider::retry_after(&headers), None);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let p = OpenAiProvider::new("sk-test", "http://localhost:1234/v1/").unwrap();
        assert_eq!(p.base_url(), "http://localhost:1234/v1");
    }
}
