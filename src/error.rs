use crate::error_code::ServiceErrorCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Field path that caused the error (e.g., "profile.skills", "config.max_retries")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "profile_validator", "config_loader")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Terminal failure handed to the outer layer.
///
/// Carries a stable machine-readable code, a human message, an optional
/// structured detail map and the moment it was created.
#[derive(Debug, Clone, Serialize, Error)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub code: ServiceErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl ServiceError {
    pub fn new(code: ServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(|v| v.as_str())
    }
}

/// Unified error type for the document generation core.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. } | Error::Configuration { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    pub fn code(&self) -> ServiceErrorCode {
        match self {
            Error::Validation { .. } => ServiceErrorCode::ValidationError,
            Error::Configuration { .. } => ServiceErrorCode::ConfigError,
            Error::Service(e) => e.code,
            Error::Io(_) | Error::Serialization(_) => ServiceErrorCode::UnknownError,
        }
    }

    /// Convert into the boundary representation used by the outer layer.
    pub fn to_service_error(&self) -> ServiceError {
        match self {
            Error::Service(e) => e.clone(),
            Error::Validation { message, context } | Error::Configuration { message, context } => {
                let mut err = ServiceError::new(self.code(), message.clone());
                if let Some(ref field) = context.field_path {
                    err = err.with_detail("field", field.as_str());
                }
                if let Some(ref details) = context.details {
                    err = err.with_detail("details", details.as_str());
                }
                err
            }
            other => ServiceError::new(other.code(), other.to_string()),
        }
    }
}

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::Service(e) => e,
            other => other.to_service_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_includes_context() {
        let err = Error::validation_with_context(
            "skills must not be empty",
            ErrorContext::new()
                .with_field_path("profile.skills")
                .with_source("profile_validator"),
        );
        assert_eq!(
            err.to_string(),
            "Validation error: skills must not be empty (field: profile.skills, source: profile_validator)"
        );
        assert_eq!(err.code(), ServiceErrorCode::ValidationError);
    }

    #[test]
    fn test_to_service_error_keeps_field() {
        let err = Error::validation_with_context(
            "target role is required",
            ErrorContext::new().with_field_path("profile.target_role"),
        );
        let svc = err.to_service_error();
        assert_eq!(svc.code, ServiceErrorCode::ValidationError);
        assert_eq!(svc.detail_str("field"), Some("profile.target_role"));
    }

    #[test]
    fn test_service_error_passes_through() {
        let inner = ServiceError::new(ServiceErrorCode::ApiError, "boom").with_detail("model", "gpt-4");
        let err: Error = inner.into();
        assert_eq!(err.code(), ServiceErrorCode::ApiError);
        let back: ServiceError = err.into();
        assert_eq!(back.detail_str("model"), Some("gpt-4"));
        assert_eq!(back.to_string(), "API_ERROR: boom");
    }

    #[test]
    fn test_service_error_serializes_without_empty_details() {
        let err = ServiceError::new(ServiceErrorCode::MaxRetries, "Maximum retry attempts exceeded");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "MAX_RETRIES");
        assert!(json.get("details").is_none());
        assert!(json["created_at"].is_string());
    }
}
