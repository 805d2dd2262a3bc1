//! Token 估算模块：在提供方未返回用量时估算 Token 数，并为文档生成元数据。
//!
//! # Token Estimation Module
//!
//! Providers usually report usage, but not always. When they don't, the
//! orchestrator falls back to an estimate so the token counter in
//! [`GenerationMetrics`](crate::metrics::GenerationMetrics) keeps moving.
//! Generated documents also carry an estimate in their metadata.
//!
//! | Estimator | Rule | Used for |
//! |-----------|------|----------|
//! | [`CharacterEstimator`] | 4 characters per token | prompts and completions without usage |
//! | [`WordEstimator`] | 1.3 tokens per word | per-document metadata |
//!
//! ## Example
//!
//! ```rust
//! use docgen_core::tokens::{CharacterEstimator, TokenCounter, WordEstimator};
//!
//! assert_eq!(CharacterEstimator::new().count("12345678"), 2);
//! assert_eq!(WordEstimator::new().count("ten words would be thirteen tokens by this rule ok"), 13);
//! ```

mod counter;

pub use counter::{CharacterEstimator, TokenCounter, WordEstimator};
