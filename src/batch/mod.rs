//! 批量生成模块：同一份档案并发生成多种文档，失败互不影响。
//!
//! # Batch Generation
//!
//! A batch takes one profile and a list of document kinds and produces one
//! result slot per distinct kind, in request order. Kinds whose
//! preconditions fail (a cover letter without a target role) are skipped up
//! front and listed in the summary instead of failing the batch.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchExecutor`] | Runs one future per item under a [`BatchStrategy`], results in input order |
//! | [`BatchCoordinator`] | Collapses duplicates, skips ineligible kinds, runs the generator, builds the report |
//! | [`BatchReport`] | Batch id, per-kind [`DocumentOutcome`] and a [`BatchSummary`] |
//!
//! A failing document never cancels its siblings: its slot holds the
//! failure reason and error code.

pub mod coordinator;
pub mod executor;

pub use coordinator::{BatchCoordinator, BatchReport, BatchSummary, DocumentOutcome, SkippedDocument};
pub use executor::{BatchExecutor, BatchRun, BatchStrategy};
