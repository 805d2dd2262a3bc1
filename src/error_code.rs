//! 服务错误码：定义稳定的、可供外层映射的错误码。
//!
//! Stable service error codes.
//!
//! Every failure that leaves the core carries one of these codes. The outer
//! HTTP layer maps them to transport status codes; the core never does.
//!
//! | Code               | Category   | Raised when                                        |
//! |--------------------|------------|----------------------------------------------------|
//! | `VALIDATION_ERROR` | client     | Profile or document parameters violate a precondition |
//! | `CONFIG_ERROR`     | client     | Service configuration is invalid or incomplete     |
//! | `API_ERROR`        | provider   | Provider failed on the final attempt               |
//! | `MAX_RETRIES`      | provider   | Retry loop ended without success or earlier raise  |
//! | `UNKNOWN_ERROR`    | unknown    | Unexpected failure on the final attempt            |
//!
//! ## Example
//!
//! ```rust
//! use docgen_core::error_code::ServiceErrorCode;
//!
//! let code = ServiceErrorCode::from_code("API_ERROR").unwrap();
//! assert_eq!(code, ServiceErrorCode::ApiError);
//! assert_eq!(code.category(), "provider");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceErrorCode {
    /// Caller-supplied data violates a precondition. Never retried.
    ValidationError,
    /// Configuration rejected at construction time.
    ConfigError,
    /// Provider-side failure surfaced after exhausting retries.
    ApiError,
    /// Retry loop completed without a success or an earlier terminal error.
    #[serde(rename = "MAX_RETRIES")]
    MaxRetries,
    /// Anything else that went wrong on the final attempt.
    UnknownError,
}

impl ServiceErrorCode {
    /// Returns the canonical code string (e.g., `"API_ERROR"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ApiError => "API_ERROR",
            Self::MaxRetries => "MAX_RETRIES",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Returns the category: `"client"`, `"provider"` or `"unknown"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ValidationError | Self::ConfigError => "client",
            Self::ApiError | Self::MaxRetries => "provider",
            Self::UnknownError => "unknown",
        }
    }

    /// Whether the caller may reasonably resubmit the same request later.
    ///
    /// Client errors will fail again with identical input.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ApiError | Self::MaxRetries | Self::UnknownError)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = match code {
            "VALIDATION_ERROR" => Self::ValidationError,
            "CONFIG_ERROR" => Self::ConfigError,
            "API_ERROR" => Self::ApiError,
            "MAX_RETRIES" => Self::MaxRetries,
            "UNKNOWN_ERROR" => Self::UnknownError,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
