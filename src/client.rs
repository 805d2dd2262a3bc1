//! Model call orchestrator.
//!
//! Wraps a [`ModelProvider`](crate::provider::ModelProvider) with retry,
//! exponential backoff, a one-time fallback model switch and a per-attempt
//! timeout. Implementation details are split into submodules under
//! `src/client/`.

pub mod builder;
pub mod core;
mod policy;
pub mod types;

pub use builder::OrchestratorBuilder;
pub use core::ModelOrchestrator;
pub use types::{CallOptions, CallStats, ModelConfig};
