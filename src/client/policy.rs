use crate::error_code::ServiceErrorCode;
use crate::provider::{FailureClass, ProviderError};
use std::time::Duration;

/// Internal decision for how to proceed after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Sleep, then retry on the same model.
    Backoff { delay: Duration },
    /// Retry at once, optionally on another model.
    Retry { switch_to: Option<String> },
    /// Stop and surface this code.
    Fail { code: ServiceErrorCode },
}

/// Retry and fallback rules for the orchestrator.
///
/// - `attempt` is 0-based; the last attempt is `max_retries - 1`.
/// - Rate limits back off `base_delay * 2^attempt` on the same model. A rate
///   limit on the last attempt has nothing left to wait for and ends the call
///   with `MAX_RETRIES`.
/// - Provider failures switch to the fallback model once, at attempt 1, and
///   raise `API_ERROR` on the last attempt.
/// - Unexpected failures retry at once and raise `UNKNOWN_ERROR` on the last
///   attempt.
#[derive(Debug, Clone)]
pub(crate) struct PolicyEngine {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub fallback_model: String,
}

/// Attempt index at which a provider failure moves to the fallback model.
const FALLBACK_SWITCH_ATTEMPT: u32 = 1;

impl PolicyEngine {
    pub fn new(max_retries: u32, base_delay: Duration, fallback_model: impl Into<String>) -> Self {
        Self {
            max_retries: max_retries.max(1),
            base_delay,
            fallback_model: fallback_model.into(),
        }
    }

    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    fn is_last(&self, attempt: u32) -> bool {
        attempt + 1 >= self.max_retries
    }

    pub fn decide(&self, err: &ProviderError, attempt: u32, current_model: &str) -> Decision {
        match err.class() {
            FailureClass::RateLimited => {
                if self.is_last(attempt) {
                    Decision::Fail {
                        code: ServiceErrorCode::MaxRetries,
                    }
                } else {
                    Decision::Backoff {
                        delay: self.backoff_delay(attempt),
                    }
                }
            }
            FailureClass::Provider => {
                if self.is_last(attempt) {
                    Decision::Fail {
                        code: ServiceErrorCode::ApiError,
                    }
                } else if attempt == FALLBACK_SWITCH_ATTEMPT && current_model != self.fallback_model {
                    Decision::Retry {
                        switch_to: Some(self.fallback_model.clone()),
                    }
                } else {
                    Decision::Retry { switch_to: None }
                }
            }
            FailureClass::Unexpected => {
                if self.is_last(attempt) {
                    Decision::Fail {
                        code: ServiceErrorCode::UnknownError,
                    }
                } else {
                    Decision::Retry { switch_to: None }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PolicyEngine {
        PolicyEngine::new(3, Duration::from_secs(1), "gpt-4")
    }

    #[test]
    fn test_backoff_doubles() {
        let p = PolicyEngine::new(5, Duration::from_millis(500), "gpt-4");
        let delays: Vec<_> = (0..4).map(|a| p.backoff_delay(a)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[test]
    fn test_rate_limit_on_last_attempt_gives_up() {
        let err = ProviderError::rate_limited("429");
        assert_eq!(
            engine().decide(&err, 1, "gpt-4o"),
            Decision::Backoff {
                delay: Duration::from_secs(2)
            }
        );
        assert_eq!(
            engine().decide(&err, 2, "gpt-4o"),
            Decision::Fail {
                code: ServiceErrorCode::MaxRetries
            }
        );
    }

    #[test]
    fn test_fallback_switch_only_at_attempt_one() {
        let err = ProviderError::api(500, "boom");
        let p = engine();
        assert_eq!(p.decide(&err, 0, "gpt-4o"), Decision::Retry { switch_to: None });
        assert_eq!(
            p.decide(&err, 1, "gpt-4o"),
            Decision::Retry {
                switch_to: Some("gpt-4".into())
            }
        );
        assert_eq!(p.decide(&err, 1, "gpt-4"), Decision::Retry { switch_to: None });
        assert_eq!(
            p.decide(&err, 2, "gpt-4"),
            Decision::Fail {
                code: ServiceErrorCode::ApiError
            }
        );
    }

    #[test]
    fn test_unexpected_errors_retry_without_switching() {
        let err = ProviderError::Other("decode panic".into());
        let p = engine();
        assert_eq!(p.decide(&err, 1, "gpt-4o"), Decision::Retry { switch_to: None });
        assert_eq!(
            p.decide(&err, 2, "gpt-4o"),
            Decision::Fail {
                code: ServiceErrorCode::UnknownError
            }
        );
    }
}
