//! Batch generation through the service facade.

mod common;

use docgen_core::generators::prompts::{INTERVIEW_PREPARATION_SYSTEM, RESUME_SYSTEM};
use docgen_core::generators::GenerationContext;
use docgen_core::provider::{Completion, ProviderError, ScriptedProvider};
use docgen_core::{DocumentKind, ServiceConfig, ServiceErrorCode};
use std::time::Duration;

fn system_prompt(req: &docgen_core::provider::CompletionRequest) -> &str {
    req.messages.first().map(|m| m.content.as_str()).unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn one_failing_kind_does_not_sink_the_batch() {
    let provider = ScriptedProvider::from_fn(|req, _| {
        if system_prompt(req) == INTERVIEW_PREPARATION_SYSTEM {
            Err(ProviderError::api(503, "overloaded"))
        } else {
            Ok(Completion::new(format!("document for {}", req.model), req.model.clone()))
        }
    });
    let svc = common::service(&provider);
    let kinds = [
        DocumentKind::Resume,
        DocumentKind::InterviewPreparation,
        DocumentKind::CoverLetter,
    ];

    let report = svc
        .batch_generate(&common::engineer(), &kinds, &GenerationContext::new())
        .await
        .unwrap();

    assert_eq!(report.summary.total_requested, 3);
    assert_eq!(report.summary.successful, 2);
    assert_eq!(report.summary.failed, 1);
    assert!((report.summary.success_rate - 200.0 / 3.0).abs() < 1e-9);
    assert!(report.summary.skipped.is_empty());

    let order: Vec<DocumentKind> = report.results.iter().map(|o| o.kind()).collect();
    assert_eq!(order, kinds.to_vec());
    assert!(report.results[0].is_success());
    assert!(!report.results[1].is_success());
    assert!(report.results[2].is_success());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["results"][1]["status"], "failed");
    assert_eq!(json["results"][1]["code"], "API_ERROR");
    assert_eq!(json["results"][0]["status"], "success");
}

#[tokio::test(start_paused = true)]
async fn tasks_run_concurrently() {
    let provider = ScriptedProvider::replying("doc").with_latency(Duration::from_secs(2));
    let svc = common::service(&provider);
    let start = tokio::time::Instant::now();

    let report = svc
        .batch_generate(&common::engineer(), &DocumentKind::ALL, &GenerationContext::new())
        .await
        .unwrap();

    assert_eq!(report.summary.successful, 4);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
    assert_eq!(report.summary.total_time_secs, 2.0);
    assert_eq!(report.summary.avg_time_per_doc_secs, 0.5);
}

#[tokio::test(start_paused = true)]
async fn concurrency_limit_is_honored() {
    let provider = ScriptedProvider::replying("doc").with_latency(Duration::from_secs(2));
    let config = ServiceConfig {
        batch_concurrency: Some(2),
        ..ServiceConfig::default()
    };
    let svc = common::service_with(&provider, config);
    let start = tokio::time::Instant::now();

    svc.batch_generate(&common::engineer(), &DocumentKind::ALL, &GenerationContext::new())
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(4));
}

#[tokio::test]
async fn cover_letter_without_target_is_skipped() {
    let provider = ScriptedProvider::replying("doc");
    let svc = common::service(&provider);
    let mut profile = common::engineer();
    profile.target_role = None;

    let report = svc
        .batch_generate(
            &profile,
            &[DocumentKind::CoverLetter, DocumentKind::Resume],
            &GenerationContext::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.summary.total_requested, 1);
    assert_eq!(report.summary.skipped.len(), 1);
    assert_eq!(report.summary.skipped[0].kind, DocumentKind::CoverLetter);
    assert_eq!(provider.calls(), 1);
    assert_eq!(system_prompt(&provider.requests()[0]), RESUME_SYSTEM);

    let err = svc
        .batch_generate(&profile, &[DocumentKind::CoverLetter], &GenerationContext::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ServiceErrorCode::ValidationError);
}

#[tokio::test]
async fn invalid_profile_fails_the_whole_batch() {
    let provider = ScriptedProvider::replying("doc");
    let svc = common::service(&provider);
    let mut profile = common::engineer();
    profile.skills.clear();

    let err = svc
        .batch_generate(&profile, &[DocumentKind::Resume], &GenerationContext::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ServiceErrorCode::ValidationError);
    assert_eq!(provider.calls(), 0);
}
