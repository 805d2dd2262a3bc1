//! Multi-document fan-out over one profile.

use super::executor::{BatchExecutor, BatchStrategy};
use crate::error_code::ServiceErrorCode;
use crate::generators::{prompt_builder, DocumentGenerator, GeneratedDocument, GenerationContext};
use crate::types::{DocumentKind, ProfileInput};
use crate::{Error, ErrorContext, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// One result slot, in the position of its kind in the request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Success {
        kind: DocumentKind,
        document: GeneratedDocument,
    },
    Failed {
        kind: DocumentKind,
        reason: String,
        code: ServiceErrorCode,
    },
}

impl DocumentOutcome {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentOutcome::Success { kind, .. } | DocumentOutcome::Failed { kind, .. } => *kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DocumentOutcome::Success { .. })
    }

    pub fn document(&self) -> Option<&GeneratedDocument> {
        match self {
            DocumentOutcome::Success { document, .. } => Some(document),
            DocumentOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub kind: DocumentKind,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Tasks actually run; skipped kinds are not counted.
    pub total_requested: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage, `0.0..=100.0`.
    pub success_rate: f64,
    pub total_time_secs: f64,
    pub avg_time_per_doc_secs: f64,
    pub skipped: Vec<SkippedDocument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: String,
    pub results: Vec<DocumentOutcome>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn outcome(&self, kind: DocumentKind) -> Option<&DocumentOutcome> {
        self.results.iter().find(|o| o.kind() == kind)
    }
}

pub struct BatchCoordinator {
    generator: DocumentGenerator,
    executor: BatchExecutor,
}

impl BatchCoordinator {
    /// `concurrency` of `None` runs every task at once.
    pub fn new(generator: DocumentGenerator, concurrency: Option<usize>) -> Self {
        Self {
            generator,
            executor: BatchExecutor::new(BatchStrategy::from_limit(concurrency)),
        }
    }

    pub async fn run(
        &self,
        profile: &ProfileInput,
        kinds: &[DocumentKind],
        ctx: &GenerationContext,
    ) -> Result<BatchReport> {
        let profile = profile.clone().validated()?;

        let mut eligible = Vec::new();
        let mut skipped = Vec::new();
        for &kind in kinds {
            if eligible.contains(&kind) || skipped.iter().any(|s: &SkippedDocument| s.kind == kind) {
                continue;
            }
            match prompt_builder(kind).check(&profile, ctx) {
                Ok(()) => eligible.push(kind),
                Err(e) => skipped.push(SkippedDocument {
                    kind,
                    reason: e.to_service_error().message,
                }),
            }
        }

        if eligible.is_empty() {
            return Err(Error::validation_with_context(
                "No documents can be generated with the provided information",
                ErrorContext::new()
                    .with_field_path("document_types")
                    .with_details(format!("requested {}, skipped {}", kinds.len(), skipped.len()))
                    .with_source("batch_coordinator"),
            ));
        }

        let batch_id = uuid::Uuid::new_v4().to_string();
        info!(batch_id = %batch_id, tasks = eligible.len(), skipped = skipped.len(), "batch started");

        let profile = &profile;
        let generator = &self.generator;
        let run = self
            .executor
            .execute(eligible.clone(), |kind| async move {
                generator.generate(kind, profile, ctx).await
            })
            .await;

        let results: Vec<DocumentOutcome> = eligible
            .iter()
            .zip(run.results)
            .map(|(&kind, r)| match r {
                Ok(document) => DocumentOutcome::Success { kind, document },
                Err(e) => {
                    let err = e.to_service_error();
                    warn!(
                        batch_id = %batch_id,
                        document_kind = kind.as_str(),
                        code = err.code.code(),
                        "batch document failed: {}",
                        err.message
                    );
                    DocumentOutcome::Failed {
                        kind,
                        reason: err.message,
                        code: err.code,
                    }
                }
            })
            .collect();

        let summary = summarize(&results, run.execution_time, skipped);
        info!(
            batch_id = %batch_id,
            successful = summary.successful,
            failed = summary.failed,
            total_time_secs = summary.total_time_secs,
            "batch finished"
        );

        Ok(BatchReport {
            batch_id,
            results,
            summary,
        })
    }
}

fn summarize(results: &[DocumentOutcome], elapsed: Duration, skipped: Vec<SkippedDocument>) -> BatchSummary {
    let total = results.len();
    let successful = results.iter().filter(|o| o.is_success()).count();
    let total_time_secs = elapsed.as_secs_f64();
    BatchSummary {
        total_requested: total,
        successful,
        failed: total - successful,
        success_rate: if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64 * 100.0
        },
        total_time_secs,
        avg_time_per_doc_secs: if total == 0 {
            0.0
        } else {
            total_time_secs / total as f64
        },
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, ResponseCache};
    use crate::client::ModelOrchestrator;
    use crate::generators::prompts::COVER_LETTER_SYSTEM;
    use crate::metrics::GenerationMetrics;
    use crate::provider::{Completion, ProviderError, ScriptedProvider};
    use crate::templates::TemplateRegistry;
    use std::sync::Arc;

    fn coordinator(provider: ScriptedProvider) -> BatchCoordinator {
        let metrics = Arc::new(GenerationMetrics::new());
        let orchestrator = ModelOrchestrator::builder(Arc::new(provider))
            .metrics(metrics.clone())
            .base_delay(Duration::from_millis(1))
            .build();
        let gen = DocumentGenerator::new(
            Arc::new(orchestrator),
            Arc::new(ResponseCache::new(CacheConfig::default(), metrics)),
            Arc::new(TemplateRegistry::builtin()),
        );
        BatchCoordinator::new(gen, None)
    }

    fn profile() -> ProfileInput {
        ProfileInput::new(
            "Backend Engineer",
            5,
            "BSc CS",
            vec!["Rust".into(), "Postgres".into()],
            "Owned the billing service end to end",
        )
    }

    #[tokio::test]
    async fn test_duplicates_collapse_and_ineligible_kinds_are_skipped() {
        let coord = coordinator(ScriptedProvider::replying("doc"));
        let kinds = [
            DocumentKind::Resume,
            DocumentKind::CoverLetter,
            DocumentKind::Resume,
            DocumentKind::InterviewPreparation,
        ];
        let report = coord.run(&profile(), &kinds, &GenerationContext::new()).await.unwrap();

        let order: Vec<DocumentKind> = report.results.iter().map(|o| o.kind()).collect();
        assert_eq!(order, vec![DocumentKind::Resume, DocumentKind::InterviewPreparation]);
        assert_eq!(report.summary.total_requested, 2);
        assert_eq!(report.summary.skipped.len(), 1);
        assert_eq!(report.summary.skipped[0].kind, DocumentKind::CoverLetter);
        assert_eq!(report.summary.success_rate, 100.0);
        assert!(uuid::Uuid::parse_str(&report.batch_id).is_ok());
    }

    #[tokio::test]
    async fn test_nothing_eligible_is_a_validation_error() {
        let coord = coordinator(ScriptedProvider::replying("doc"));
        let err = coord
            .run(&profile(), &[DocumentKind::CoverLetter], &GenerationContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ServiceErrorCode::ValidationError);

        let err = coord.run(&profile(), &[], &GenerationContext::new()).await.unwrap_err();
        assert_eq!(err.code(), ServiceErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_failed_slot_carries_code() {
        let provider = ScriptedProvider::from_fn(|req, _| {
            if req.messages.first().map(|m| m.content.as_str()) == Some(COVER_LETTER_SYSTEM) {
                Err(ProviderError::api(500, "upstream exploded"))
            } else {
                Ok(Completion::new("ok", req.model.clone()))
            }
        });
        let coord = coordinator(provider);
        let report = coord
            .run(
                &profile().with_target_role("Staff Engineer"),
                &[DocumentKind::Resume, DocumentKind::CoverLetter],
                &GenerationContext::new(),
            )
            .await
            .unwrap();

        assert!(report.results[0].is_success());
        match &report.results[1] {
            DocumentOutcome::Failed { code, reason, .. } => {
                assert_eq!(*code, ServiceErrorCode::ApiError);
                assert!(reason.contains("3 attempts"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.success_rate, 50.0);
    }
}
