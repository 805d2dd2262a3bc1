//! # docgen-core
//!
//! 这是求职文档生成服务的编排核心：档案校验、提示词构建、模型调用重试与降级、响应缓存、批量生成与运行指标。
//!
//! Orchestration core for an LLM-backed career-document service. Given a
//! professional profile it produces a resume, a cover letter, a LinkedIn
//! profile optimization or an interview preparation guide.
//!
//! ## Overview
//!
//! Every document goes through the same pipeline:
//!
//! 1. the [`ProfileInput`](types::ProfileInput) is validated and normalized
//! 2. a template is resolved and a prompt is built for the document kind
//! 3. the request is fingerprinted and the response cache consulted
//! 4. on a miss the [`ModelOrchestrator`](client::ModelOrchestrator) calls the
//!    provider with retry, exponential backoff and a one-time fallback switch
//! 5. the answer is cached and returned with its metadata
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docgen_core::generators::GenerationContext;
//! use docgen_core::types::{DocumentKind, ProfileInput};
//! use docgen_core::DocumentService;
//!
//! #[tokio::main]
//! async fn main() -> docgen_core::Result<()> {
//!     let service = DocumentService::from_env()?;
//!     let profile = ProfileInput::new(
//!         "Senior Data Engineer",
//!         8,
//!         "MSc Computer Science",
//!         vec!["Spark".into(), "Airflow".into(), "SQL".into()],
//!         "Led the migration of a 2 PB warehouse to a lakehouse architecture",
//!     )
//!     .with_target_role("Staff Data Engineer");
//!
//!     let report = service
//!         .batch_generate(
//!             &profile,
//!             &[DocumentKind::Resume, DocumentKind::CoverLetter],
//!             &GenerationContext::new().with_job_description("Own the data platform"),
//!         )
//!         .await?;
//!     println!("{} of {} documents generated", report.summary.successful, report.summary.total_requested);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`service`] | [`DocumentService`] facade and its builder |
//! | [`generators`] | Prompt builders per document kind and the shared generation pipeline |
//! | [`client`] | Model orchestrator: retry, backoff, fallback, per-attempt timeout |
//! | [`provider`] | Model provider trait, OpenAI-compatible HTTP provider, scripted provider |
//! | [`cache`] | Request fingerprinting and the TTL response cache |
//! | [`batch`] | Concurrent multi-document generation with failure isolation |
//! | [`templates`] | Built-in document templates and selection rules |
//! | [`metrics`] | Generation counters, analytics and health reports |
//! | [`tokens`] | Token estimation |
//! | [`types`] | Profile, document kind and message types |
//! | [`config`] | `ServiceConfig` from defaults, YAML and environment |

pub mod batch;
pub mod cache;
pub mod client;
pub mod config;
pub mod error_code;
pub mod generators;
pub mod metrics;
pub mod provider;
pub mod service;
pub mod templates;
pub mod tokens;
pub mod types;

pub use client::{CallOptions, CallStats, ModelOrchestrator};
pub use config::ServiceConfig;
pub use error_code::ServiceErrorCode;
pub use service::{DocumentService, DocumentServiceBuilder};
pub use types::{DocumentKind, Message, MessageRole, ProfileInput};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ServiceError};
