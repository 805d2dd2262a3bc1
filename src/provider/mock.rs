use super::{Completion, CompletionRequest, ModelProvider, ProviderError, TokenUsage};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Script =
    Arc<dyn Fn(&CompletionRequest, usize) -> Result<Completion, ProviderError> + Send + Sync>;

/// Provider that answers from a closure instead of the network.
///
/// The closure receives the request and the zero-based call index. Every
/// request is recorded so tests can assert on models, temperatures and
/// prompts afterwards.
#[derive(Clone)]
pub struct ScriptedProvider {
    script: Script,
    latency: Option<Duration>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&CompletionRequest, usize) -> Result<Completion, ProviderError> + Send + Sync + 'static,
    {
        Self {
            script: Arc::new(f),
            latency: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always succeeds with `text`, reporting usage from a whitespace word count.
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_fn(move |req, _| {
            let words = text.split_whitespace().count() as u64;
            Ok(Completion::new(text.clone(), req.model.clone()).with_usage(TokenUsage::new(10, words)))
        })
    }

    /// Plays `outcomes` in order, repeating the last one once exhausted.
    pub fn sequence(outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self::from_fn(move |req, idx| {
            let outcome = outcomes
                .get(idx)
                .or_else(|| outcomes.last())
                .cloned()
                .unwrap_or_else(|| Err(ProviderError::Other("empty script".into())));
            outcome.map(|text| Completion::new(text, req.model.clone()))
        })
    }

    /// Echoes a canned document that names the model and temperature used.
    pub fn dry_run() -> Self {
        Self::from_fn(|req, _| {
            Ok(Completion::new(
                format!(
                    "[dry run] {} at temperature {:.1}, {} prompt characters",
                    req.model,
                    req.temperature,
                    req.prompt_text().chars().count()
                ),
                req.model.clone(),
            ))
        })
    }

    /// Sleep before answering, for exercising the per-attempt timeout.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn models_called(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.model).collect()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        let idx = {
            let mut requests = self
                .requests
                .lock()
                .map_err(|_| ProviderError::Other("request log poisoned".into()))?;
            requests.push(request.clone());
            requests.len() - 1
        };
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        (self.script)(request, idx)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[tokio::test]
    async fn test_sequence_repeats_last_outcome() {
        let provider = ScriptedProvider::sequence(vec![
            Err(ProviderError::rate_limited("busy")),
            Ok("done".into()),
        ]);
        let req = CompletionRequest::new("gpt-4o", vec![Message::user("hi")]);
        assert!(provider.complete(&req).await.is_err());
        assert_eq!(provider.complete(&req).await.unwrap().content, "done");
        assert_eq!(provider.complete(&req).await.unwrap().content, "done");
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_dry_run_names_model() {
        let provider = ScriptedProvider::dry_run();
        let req = CompletionRequest::new("gpt-4", vec![Message::user("abc")]).temperature(0.8);
        let out = provider.complete(&req).await.unwrap();
        assert!(out.content.contains("gpt-4 at temperature 0.8"));
        assert_eq!(provider.models_called(), vec!["gpt-4"]);
    }
}
