//! Service facade: one entry point owning the orchestrator, cache, templates
//! and metrics of a single instance.

use crate::batch::{BatchCoordinator, BatchReport};
use crate::cache::ResponseCache;
use crate::client::{CallOptions, ModelConfig, ModelOrchestrator};
use crate::config::ServiceConfig;
use crate::generators::{DocumentGenerator, GeneratedDocument, GenerationContext};
use crate::metrics::report::{
    CacheReport, ComponentStatus, HealthComponents, HealthReport, ModelInfo, ServiceAnalytics,
    UptimeReport,
};
use crate::metrics::{GenerationMetrics, MetricsSnapshot};
use crate::provider::{ModelProvider, OpenAiProvider};
use crate::templates::TemplateRegistry;
use crate::types::{DocumentKind, Message, ProfileInput};
use crate::Result;
use std::sync::Arc;
use tracing::{error, info};

const HEALTH_PROBE_PROMPT: &str = "Respond with 'OK'";
const HEALTH_PROBE_MAX_TOKENS: u32 = 5;

/// Document generation service.
///
/// ```rust
/// use docgen_core::provider::ScriptedProvider;
/// use docgen_core::types::{DocumentKind, ProfileInput};
/// use docgen_core::generators::GenerationContext;
/// use docgen_core::DocumentService;
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let service = DocumentService::builder()
///     .provider(Arc::new(ScriptedProvider::replying("Jane Doe, Platform Engineer")))
///     .build()
///     .unwrap();
/// let profile = ProfileInput::new(
///     "Platform Engineer",
///     7,
///     "BSc Computer Science",
///     vec!["Kubernetes".into(), "Go".into()],
///     "Ran the internal deploy platform for 40 teams",
/// );
/// let doc = service
///     .generate(DocumentKind::Resume, &profile, &GenerationContext::new())
///     .await
///     .unwrap();
/// assert!(!doc.cached);
/// # });
/// ```
pub struct DocumentService {
    config: ServiceConfig,
    orchestrator: Arc<ModelOrchestrator>,
    cache: Arc<ResponseCache>,
    generator: DocumentGenerator,
    metrics: Arc<GenerationMetrics>,
}

impl DocumentService {
    pub fn builder() -> DocumentServiceBuilder {
        DocumentServiceBuilder::new()
    }

    /// Configuration from `DOCGEN_*` variables and the OpenAI provider from
    /// the keyring or `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::builder().config(ServiceConfig::from_env()?).build()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<GenerationMetrics> {
        &self.metrics
    }

    pub async fn generate(
        &self,
        kind: DocumentKind,
        profile: &ProfileInput,
        ctx: &GenerationContext,
    ) -> Result<GeneratedDocument> {
        self.generator.generate(kind, profile, ctx).await
    }

    pub async fn resume(&self, profile: &ProfileInput, ctx: &GenerationContext) -> Result<GeneratedDocument> {
        self.generate(DocumentKind::Resume, profile, ctx).await
    }

    pub async fn cover_letter(&self, profile: &ProfileInput, ctx: &GenerationContext) -> Result<GeneratedDocument> {
        self.generate(DocumentKind::CoverLetter, profile, ctx).await
    }

    pub async fn profile_optimization(
        &self,
        profile: &ProfileInput,
        ctx: &GenerationContext,
    ) -> Result<GeneratedDocument> {
        self.generate(DocumentKind::ProfileOptimization, profile, ctx).await
    }

    pub async fn interview_preparation(
        &self,
        profile: &ProfileInput,
        ctx: &GenerationContext,
    ) -> Result<GeneratedDocument> {
        self.generate(DocumentKind::InterviewPreparation, profile, ctx).await
    }

    /// Generate several kinds for one profile. Individual failures land in
    /// their result slot; only an empty set of eligible kinds is an error.
    pub async fn batch_generate(
        &self,
        profile: &ProfileInput,
        kinds: &[DocumentKind],
        ctx: &GenerationContext,
    ) -> Result<BatchReport> {
        BatchCoordinator::new(self.generator.clone(), self.config.batch_concurrency)
            .run(profile, kinds, ctx)
            .await
    }

    pub async fn analytics(&self) -> Result<ServiceAnalytics> {
        let size = self.cache.len().await?;
        Ok(ServiceAnalytics {
            metrics: self.metrics.snapshot(),
            cache: CacheReport::new(self.cache.is_enabled(), size, &self.cache.stats()),
            models: ModelInfo {
                primary_model: self.config.model.clone(),
                fallback_model: self.config.fallback_model.clone(),
                model_configurations: ModelConfig::table().clone(),
            },
            uptime: UptimeReport::since(self.metrics.started_at()),
            analytics_enabled: self.config.analytics_enabled,
        })
    }

    /// Round-trip the provider and the cache. Never fails; any error is
    /// reported as an unhealthy status.
    pub async fn health_check(&self) -> HealthReport {
        match self.probe().await {
            Ok((components, metrics)) => {
                info!(
                    api = ?components.api_connectivity,
                    cache = ?components.cache,
                    "health check completed"
                );
                HealthReport::healthy(components, metrics)
            }
            Err(e) => {
                error!("health check failed: {}", e);
                HealthReport::unhealthy(e.to_string())
            }
        }
    }

    async fn probe(&self) -> Result<(HealthComponents, MetricsSnapshot)> {
        let reply = self
            .orchestrator
            .call_model(
                vec![Message::user(HEALTH_PROBE_PROMPT)],
                CallOptions::new().max_tokens(HEALTH_PROBE_MAX_TOKENS),
            )
            .await?;
        let api_connectivity = if reply.trim() == "OK" {
            ComponentStatus::Working
        } else {
            ComponentStatus::Failed
        };

        let cache = if !self.cache.is_enabled() {
            ComponentStatus::Disabled
        } else if self.cache.self_test().await? {
            ComponentStatus::Working
        } else {
            ComponentStatus::Failed
        };

        let analytics = if self.config.analytics_enabled {
            ComponentStatus::Enabled
        } else {
            ComponentStatus::Disabled
        };

        Ok((
            HealthComponents {
                api_connectivity,
                cache,
                analytics,
                primary_model: self.config.model.clone(),
                fallback_model: self.config.fallback_model.clone(),
            },
            self.metrics.snapshot(),
        ))
    }
}

/// Builder for [`DocumentService`].
#[derive(Default)]
pub struct DocumentServiceBuilder {
    config: Option<ServiceConfig>,
    provider: Option<Arc<dyn ModelProvider>>,
    templates: Option<TemplateRegistry>,
}

impl DocumentServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Defaults to [`OpenAiProvider::from_env`] when unset.
    pub fn provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the built-in templates.
    pub fn templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn build(self) -> Result<DocumentService> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let provider: Arc<dyn ModelProvider> = match self.provider {
            Some(p) => p,
            None => Arc::new(OpenAiProvider::from_env()?),
        };

        let metrics = Arc::new(GenerationMetrics::new());
        let orchestrator = Arc::new(
            ModelOrchestrator::builder(provider)
                .config(&config)
                .metrics(metrics.clone())
                .build(),
        );
        let cache = Arc::new(ResponseCache::new(config.cache_config(), metrics.clone()));
        let templates = Arc::new(self.templates.unwrap_or_default());
        let generator = DocumentGenerator::new(orchestrator.clone(), cache.clone(), templates);

        info!(
            model = %config.model,
            fallback_model = %config.fallback_model,
            cache_enabled = config.cache_enabled,
            "document service initialized"
        );

        Ok(DocumentService {
            config,
            orchestrator,
            cache,
            generator,
            metrics,
        })
    }
}
