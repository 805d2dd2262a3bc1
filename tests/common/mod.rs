//! Shared fixtures for integration tests

#![allow(dead_code)]

use docgen_core::provider::ScriptedProvider;
use docgen_core::types::{Industry, ProfileInput};
use docgen_core::{DocumentService, ServiceConfig};
use std::sync::Arc;

pub fn engineer() -> ProfileInput {
    ProfileInput::new(
        "Senior Software Engineer",
        7,
        "BSc Computer Science",
        vec!["Rust".into(), "PostgreSQL".into(), "Kubernetes".into()],
        "Built the order routing service used by 300 merchants",
    )
    .with_industry(Industry::Technology)
    .with_target_role("Staff Software Engineer")
}

pub fn service(provider: &ScriptedProvider) -> DocumentService {
    service_with(provider, ServiceConfig::default())
}

pub fn service_with(provider: &ScriptedProvider, config: ServiceConfig) -> DocumentService {
    DocumentService::builder()
        .config(config)
        .provider(Arc::new(provider.clone()))
        .build()
        .expect("service")
}
