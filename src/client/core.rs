use crate::client::policy::{Decision, PolicyEngine};
use crate::client::types::{CallOptions, CallStats, ModelConfig};
use crate::error_code::ServiceErrorCode;
use crate::metrics::GenerationMetrics;
use crate::provider::{Completion, CompletionRequest, ModelProvider, ProviderError, TokenUsage};
use crate::tokens::{CharacterEstimator, TokenCounter};
use crate::types::Message;
use crate::{Result, ServiceError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Retry, backoff and fallback around a [`ModelProvider`].
///
/// Attempts run one after another. Every attempt counts as an API call in
/// the shared metrics; only a success adds tokens and generation time.
pub struct ModelOrchestrator {
    pub(crate) provider: Arc<dyn ModelProvider>,
    pub(crate) primary_model: String,
    pub(crate) policy: PolicyEngine,
    pub(crate) attempt_timeout: Duration,
    pub(crate) metrics: Arc<GenerationMetrics>,
    pub(crate) analytics_enabled: bool,
    pub(crate) estimator: CharacterEstimator,
}

impl ModelOrchestrator {
    pub fn builder(provider: Arc<dyn ModelProvider>) -> crate::client::OrchestratorBuilder {
        crate::client::OrchestratorBuilder::new(provider)
    }

    pub fn primary_model(&self) -> &str {
        &self.primary_model
    }

    pub fn fallback_model(&self) -> &str {
        &self.policy.fallback_model
    }

    pub fn max_retries(&self) -> u32 {
        self.policy.max_retries
    }

    pub fn metrics(&self) -> &Arc<GenerationMetrics> {
        &self.metrics
    }

    /// Call the model and return only the generated text.
    pub async fn call_model(&self, messages: Vec<Message>, options: CallOptions) -> Result<String> {
        Ok(self.call_model_with_stats(messages, options).await?.0.content)
    }

    /// Call the model and also return per-call stats.
    pub async fn call_model_with_stats(
        &self,
        messages: Vec<Message>,
        options: CallOptions,
    ) -> Result<(Completion, CallStats)> {
        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        let mut model = options
            .model
            .clone()
            .unwrap_or_else(|| self.primary_model.clone());
        let mut backoff_delays = Vec::new();
        let mut retry_after_hints = Vec::new();
        let mut used_fallback = false;
        let mut last_err: Option<ProviderError> = None;

        for attempt in 0..self.policy.max_retries {
            self.metrics.record_api_call();

            let config = ModelConfig::lookup(&model);
            let request = CompletionRequest::new(model.clone(), messages.clone())
                .temperature(options.temperature.unwrap_or(config.temperature))
                .max_tokens(options.max_tokens.unwrap_or(config.max_tokens));

            let outcome = match tokio::time::timeout(self.attempt_timeout, self.provider.complete(&request)).await {
                Ok(r) => r,
                Err(_) => Err(ProviderError::Timeout(self.attempt_timeout)),
            };

            let err = match outcome {
                Ok(completion) => {
                    let (usage, usage_estimated) = match completion.usage {
                        Some(u) => (u, false),
                        None => (self.estimate_usage(&request, &completion.content), true),
                    };
                    let duration = started.elapsed();
                    if self.analytics_enabled {
                        self.metrics.record_success(usage.total_tokens, duration);
                    }
                    info!(
                        request_id = request_id.as_str(),
                        model = model.as_str(),
                        attempt = attempt + 1,
                        total_tokens = usage.total_tokens,
                        duration_ms = duration.as_millis(),
                        "model call succeeded"
                    );
                    let stats = CallStats {
                        request_id,
                        model,
                        attempts: attempt + 1,
                        backoff_delays,
                        retry_after_hints,
                        used_fallback,
                        duration,
                        usage,
                        usage_estimated,
                    };
                    return Ok((completion, stats));
                }
                Err(e) => e,
            };

            match self.policy.decide(&err, attempt, &model) {
                Decision::Backoff { delay } => {
                    let hint = err.retry_after();
                    warn!(
                        request_id = request_id.as_str(),
                        model = model.as_str(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis(),
                        retry_after_ms = hint.map(|d| d.as_millis() as u64),
                        "rate limited, backing off"
                    );
                    retry_after_hints.extend(hint);
                    backoff_delays.push(delay);
                    tokio::time::sleep(delay).await;
                }
                Decision::Retry { switch_to } => {
                    warn!(
                        request_id = request_id.as_str(),
                        model = model.as_str(),
                        attempt = attempt + 1,
                        error_kind = err.kind(),
                        error = %err,
                        "model call failed, retrying"
                    );
                    if let Some(fallback) = switch_to {
                        info!(
                            request_id = request_id.as_str(),
                            from = model.as_str(),
                            to = fallback.as_str(),
                            "switching to fallback model"
                        );
                        model = fallback;
                        used_fallback = true;
                    }
                }
                Decision::Fail { code } => {
                    let failure = self.failure(code, &err, &model);
                    error!(
                        request_id = request_id.as_str(),
                        model = model.as_str(),
                        attempts = attempt + 1,
                        code = code.code(),
                        error = %err,
                        "model call failed"
                    );
                    return Err(failure.into());
                }
            }
            last_err = Some(err);
        }

        let mut failure = ServiceError::new(ServiceErrorCode::MaxRetries, "Maximum retry attempts exceeded")
            .with_detail("model", model.as_str())
            .with_detail("attempts", self.policy.max_retries);
        if let Some(err) = last_err {
            failure = failure.with_detail("last_error", err.to_string());
        }
        Err(failure.into())
    }

    fn failure(&self, code: ServiceErrorCode, err: &ProviderError, model: &str) -> ServiceError {
        let attempts = self.policy.max_retries;
        let message = match code {
            ServiceErrorCode::ApiError => format!("API call failed after {} attempts", attempts),
            ServiceErrorCode::UnknownError => format!("Unexpected error: {}", err),
            _ => "Maximum retry attempts exceeded".to_string(),
        };
        ServiceError::new(code, message)
            .with_detail("original_error", err.to_string())
            .with_detail("error_kind", err.kind())
            .with_detail("model", model)
            .with_detail("attempts", attempts)
    }

    fn estimate_usage(&self, request: &CompletionRequest, content: &str) -> TokenUsage {
        let prompt = self.estimator.count_messages(&request.messages) as u64;
        let completion = self.estimator.count(content) as u64;
        TokenUsage::new(prompt, completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ScriptedProvider;
    use crate::Error;

    fn orchestrator(provider: ScriptedProvider, max_retries: u32) -> ModelOrchestrator {
        ModelOrchestrator::builder(Arc::new(provider))
            .primary_model("gpt-4o")
            .fallback_model("gpt-4")
            .max_retries(max_retries)
            .base_delay(Duration::from_secs(1))
            .attempt_timeout(Duration::from_secs(90))
            .build()
    }

    fn service_error(err: Error) -> ServiceError {
        match err {
            Error::Service(e) => e,
            other => panic!("expected service error, got {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_records_usage_and_time() {
        let provider = ScriptedProvider::replying("three word answer");
        let orch = orchestrator(provider.clone(), 3);
        let (completion, stats) = orch
            .call_model_with_stats(vec![Message::user("hi")], CallOptions::new().temperature(0.6))
            .await
            .unwrap();
        assert_eq!(completion.content, "three word answer");
        assert_eq!(stats.attempts, 1);
        assert!(!stats.usage_estimated);
        assert_eq!(orch.metrics().api_calls(), 1);
        assert_eq!(orch.metrics().tokens_used(), 13);

        let req = &provider.requests()[0];
        assert_eq!(req.temperature, 0.6);
        assert_eq!(req.max_tokens, 4000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_usage_is_estimated() {
        let provider = ScriptedProvider::sequence(vec![Ok("abcdefgh".into())]);
        let orch = orchestrator(provider, 3);
        let (_, stats) = orch
            .call_model_with_stats(vec![Message::user("abcd")], CallOptions::new())
            .await
            .unwrap();
        assert!(stats.usage_estimated);
        assert_eq!(stats.usage.total_tokens, 5 + 2);
        assert_eq!(orch.metrics().tokens_used(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_error_on_last_attempt() {
        let provider = ScriptedProvider::sequence(vec![Err(ProviderError::Other("bad state".into()))]);
        let orch = orchestrator(provider.clone(), 2);
        let err = service_error(orch.call_model(vec![Message::user("hi")], CallOptions::new()).await.unwrap_err());
        assert_eq!(err.code, ServiceErrorCode::UnknownError);
        assert_eq!(provider.calls(), 2);
        assert_eq!(provider.models_called(), vec!["gpt-4o", "gpt-4o"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_provider_failure() {
        let provider = ScriptedProvider::replying("late").with_latency(Duration::from_secs(120));
        let orch = orchestrator(provider.clone(), 3);
        let err = service_error(orch.call_model(vec![Message::user("hi")], CallOptions::new()).await.unwrap_err());
        assert_eq!(err.code, ServiceErrorCode::ApiError);
        assert_eq!(err.detail_str("error_kind"), Some("timeout"));
        assert_eq!(err.detail_str("model"), Some("gpt-4"));
        assert_eq!(provider.calls(), 3);
        assert_eq!(orch.metrics().tokens_used(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_max_tokens_survive_fallback() {
        let provider = ScriptedProvider::sequence(vec![
            Err(ProviderError::api(500, "a")),
            Err(ProviderError::api(500, "b")),
            Ok("ok".into()),
        ]);
        let orch = orchestrator(provider.clone(), 3);
        orch.call_model(vec![Message::user("hi")], CallOptions::new().max_tokens(5))
            .await
            .unwrap();
        let reqs = provider.requests();
        assert_eq!(reqs[2].model, "gpt-4");
        assert!(reqs.iter().all(|r| r.max_tokens == 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_defaults_follow_the_switch() {
        let provider = ScriptedProvider::sequence(vec![
            Err(ProviderError::api(500, "a")),
            Err(ProviderError::api(500, "b")),
            Ok("ok".into()),
        ]);
        let orch = orchestrator(provider.clone(), 3);
        orch.call_model(vec![Message::user("hi")], CallOptions::new())
            .await
            .unwrap();
        let tokens: Vec<u32> = provider.requests().iter().map(|r| r.max_tokens).collect();
        assert_eq!(tokens, vec![4000, 4000, 3000]);
    }
}
