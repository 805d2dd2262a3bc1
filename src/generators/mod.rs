//! 文档生成模块：为四种文档构建提示词，查询缓存并委托编排器调用模型。
//!
//! # Document Generators
//!
//! One [`PromptBuilder`] per [`DocumentKind`] turns a profile, the optional
//! request context and an optional template into a system and a user
//! prompt. [`DocumentGenerator`] runs the shared pipeline around them:
//!
//! 1. validate the profile and the kind-specific preconditions
//! 2. resolve the template (explicit id first, then the selection rule)
//! 3. fingerprint every caller-visible input and consult the cache
//! 4. on a miss, call the orchestrator at the kind's temperature and store the result
//!
//! | Kind | Builder | Temperature | Precondition |
//! |------|---------|-------------|--------------|
//! | resume | [`ResumePrompt`] | 0.6 | none |
//! | cover letter | [`CoverLetterPrompt`] | 0.8 | target role |
//! | profile optimization | [`ProfileOptimizationPrompt`] | 0.7 | none |
//! | interview preparation | [`InterviewPrepPrompt`] | 0.6 | none |

pub mod cover_letter;
pub mod interview_prep;
pub mod profile_optimization;
pub mod prompts;
pub mod resume;

pub use cover_letter::CoverLetterPrompt;
pub use interview_prep::InterviewPrepPrompt;
pub use profile_optimization::ProfileOptimizationPrompt;
pub use resume::ResumePrompt;

use crate::cache::ResponseCache;
use crate::client::{CallOptions, ModelOrchestrator};
use crate::templates::{DocumentTemplate, TemplateRegistry};
use crate::tokens::{TokenCounter, WordEstimator};
use crate::types::{DocumentKind, Message, ProfileInput};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Section count reported when no template was used.
pub const DEFAULT_SECTION_COUNT: usize = 5;

/// Optional request inputs that sit beside the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationContext {
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub company_info: Option<String>,
    #[serde(default)]
    pub hiring_manager: Option<String>,
    /// Explicit template id; ignored when not in the registry.
    #[serde(default)]
    pub template: Option<String>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job_description(mut self, text: impl Into<String>) -> Self {
        self.job_description = Some(text.into());
        self
    }

    pub fn with_company_info(mut self, text: impl Into<String>) -> Self {
        self.company_info = Some(text.into());
        self
    }

    pub fn with_hiring_manager(mut self, name: impl Into<String>) -> Self {
        self.hiring_manager = Some(name.into());
        self
    }

    pub fn with_template(mut self, id: impl Into<String>) -> Self {
        self.template = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    pub fn into_messages(self) -> Vec<Message> {
        vec![Message::system(self.system), Message::user(self.user)]
    }
}

pub trait PromptBuilder: Send + Sync {
    fn kind(&self) -> DocumentKind;

    fn temperature(&self) -> f32;

    /// Kind-specific preconditions beyond profile validation.
    fn check(&self, _profile: &ProfileInput, _ctx: &GenerationContext) -> Result<()> {
        Ok(())
    }

    fn build(
        &self,
        profile: &ProfileInput,
        ctx: &GenerationContext,
        template: Option<&DocumentTemplate>,
    ) -> Prompt;
}

pub fn prompt_builder(kind: DocumentKind) -> &'static dyn PromptBuilder {
    match kind {
        DocumentKind::Resume => &ResumePrompt,
        DocumentKind::CoverLetter => &CoverLetterPrompt,
        DocumentKind::ProfileOptimization => &ProfileOptimizationPrompt,
        DocumentKind::InterviewPreparation => &InterviewPrepPrompt,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMetrics {
    pub tokens_estimated: usize,
    pub word_count: usize,
    pub char_count: usize,
    pub sections_included: usize,
}

impl DocumentMetrics {
    pub fn measure(content: &str, template: Option<&DocumentTemplate>) -> Self {
        Self {
            tokens_estimated: WordEstimator::new().count(content),
            word_count: content.split_whitespace().count(),
            char_count: content.chars().count(),
            sections_included: template
                .map(|t| t.sections.len())
                .unwrap_or(DEFAULT_SECTION_COUNT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    pub kind: DocumentKind,
    pub content: String,
    /// Display name of the template, `None` for the default layout.
    pub template_used: Option<String>,
    pub cached: bool,
    pub metrics: DocumentMetrics,
    pub generated_at: DateTime<Utc>,
}

/// Shared generation pipeline for every document kind.
#[derive(Clone)]
pub struct DocumentGenerator {
    orchestrator: Arc<ModelOrchestrator>,
    cache: Arc<ResponseCache>,
    templates: Arc<TemplateRegistry>,
}

impl DocumentGenerator {
    pub fn new(
        orchestrator: Arc<ModelOrchestrator>,
        cache: Arc<ResponseCache>,
        templates: Arc<TemplateRegistry>,
    ) -> Self {
        Self {
            orchestrator,
            cache,
            templates,
        }
    }

    /// Validation and precondition checks only; no cache or model access.
    pub fn prepare(&self, kind: DocumentKind, profile: &ProfileInput, ctx: &GenerationContext) -> Result<ProfileInput> {
        let profile = profile.clone().validated()?;
        prompt_builder(kind).check(&profile, ctx)?;
        Ok(profile)
    }

    pub async fn generate(
        &self,
        kind: DocumentKind,
        profile: &ProfileInput,
        ctx: &GenerationContext,
    ) -> Result<GeneratedDocument> {
        let builder = prompt_builder(kind);
        let profile = self.prepare(kind, profile, ctx)?;
        let template = self.templates.resolve(kind, &profile, ctx.template.as_deref());

        let payload = serde_json::json!({
            "profile": &profile,
            "job_description": ctx.job_description.as_deref().unwrap_or_default(),
            "company_info": ctx.company_info.as_deref().unwrap_or_default(),
            "hiring_manager": ctx.hiring_manager.as_deref().unwrap_or_default(),
        });
        let template_id = template.as_ref().map(|t| t.id.as_str()).unwrap_or_default();
        let key = self.cache.fingerprint(&payload, kind, template_id);

        if let Some(content) = self.cache.get(&key).await? {
            info!(document_kind = kind.as_str(), cached = true, "document served from cache");
            return Ok(self.document(kind, content, template.as_deref(), true));
        }

        let messages = builder.build(&profile, ctx, template.as_deref()).into_messages();
        let content = self
            .orchestrator
            .call_model(messages, CallOptions::new().temperature(builder.temperature()))
            .await?;
        self.cache.set(&key, &content).await?;

        info!(
            document_kind = kind.as_str(),
            cached = false,
            template = template_id,
            "document generated"
        );
        Ok(self.document(kind, content, template.as_deref(), false))
    }

    fn document(
        &self,
        kind: DocumentKind,
        content: String,
        template: Option<&DocumentTemplate>,
        cached: bool,
    ) -> GeneratedDocument {
        GeneratedDocument {
            kind,
            metrics: DocumentMetrics::measure(&content, template),
            template_used: template.map(|t| t.name.clone()),
            content,
            cached,
            generated_at: Utc::now(),
        }
    }
}

/// Template requirements interpolated into a user prompt.
pub(crate) fn template_block(t: &DocumentTemplate) -> String {
    let mut out = format!(
        "\nTEMPLATE REQUIREMENTS:\n\
         - Follow the '{}' format\n\
         - Include these sections: {}\n\
         - Use a {} tone\n\
         - Target keywords: {}\n\
         - Maximum length: {} characters\n",
        t.name,
        t.sections.join(", "),
        t.tone.as_str(),
        t.keywords.join(", "),
        t.max_length
    );
    if !t.custom_instructions.is_empty() {
        out.push_str(&format!("- Additional instructions: {}\n", t.custom_instructions));
    }
    out
}

pub(crate) fn optional_line(label: &str, value: Option<&str>) -> String {
    value
        .map(|v| format!("- {}: {}\n", label, v))
        .unwrap_or_default()
}

pub(crate) fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::metrics::GenerationMetrics;
    use crate::provider::ScriptedProvider;
    use crate::types::Industry;

    fn generator(provider: ScriptedProvider) -> (DocumentGenerator, Arc<GenerationMetrics>) {
        let metrics = Arc::new(GenerationMetrics::new());
        let orchestrator = ModelOrchestrator::builder(Arc::new(provider))
            .metrics(metrics.clone())
            .build();
        let cache = ResponseCache::new(CacheConfig::default(), metrics.clone());
        let gen = DocumentGenerator::new(
            Arc::new(orchestrator),
            Arc::new(cache),
            Arc::new(TemplateRegistry::builtin()),
        );
        (gen, metrics)
    }

    fn profile() -> ProfileInput {
        ProfileInput::new(
            "Data Engineer",
            4,
            "BSc Mathematics",
            vec!["Spark".into(), "SQL".into()],
            "Built streaming pipelines for retail analytics",
        )
        .with_industry(Industry::Technology)
    }

    #[tokio::test]
    async fn test_second_identical_request_is_cached() {
        let provider = ScriptedProvider::replying("a generated resume");
        let (gen, metrics) = generator(provider.clone());
        let ctx = GenerationContext::new();

        let first = gen.generate(DocumentKind::Resume, &profile(), &ctx).await.unwrap();
        assert!(!first.cached);
        assert_eq!(first.template_used.as_deref(), Some("Technology Resume"));
        assert_eq!(first.metrics.sections_included, 5);
        assert_eq!(first.metrics.word_count, 3);

        let second = gen.generate(DocumentKind::Resume, &profile(), &ctx).await.unwrap();
        assert!(second.cached);
        assert_eq!(second.content, first.content);
        assert_eq!(provider.calls(), 1);
        assert_eq!(metrics.api_calls(), 1);
        assert_eq!(metrics.cache_hits(), 1);
    }

    #[tokio::test]
    async fn test_every_context_field_changes_the_fingerprint() {
        let provider = ScriptedProvider::replying("text");
        let (gen, _) = generator(provider.clone());
        let p = profile().with_target_role("Staff Data Engineer");
        let contexts = [
            GenerationContext::new(),
            GenerationContext::new().with_job_description("jd"),
            GenerationContext::new().with_company_info("acme"),
            GenerationContext::new().with_hiring_manager("Sam"),
            GenerationContext::new().with_template("creative_portfolio"),
        ];
        for ctx in &contexts {
            let doc = gen.generate(DocumentKind::CoverLetter, &p, ctx).await.unwrap();
            assert!(!doc.cached);
        }
        assert_eq!(provider.calls(), contexts.len());
    }

    #[tokio::test]
    async fn test_kind_temperature_is_sent() {
        let provider = ScriptedProvider::replying("text");
        let (gen, _) = generator(provider.clone());
        let p = profile().with_target_role("Lead");
        for kind in DocumentKind::ALL {
            gen.generate(kind, &p, &GenerationContext::new()).await.unwrap();
        }
        let temps: Vec<f32> = provider.requests().iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![0.6, 0.8, 0.7, 0.6]);
    }

    #[tokio::test]
    async fn test_cover_letter_without_target_fails_before_any_call() {
        let provider = ScriptedProvider::replying("text");
        let (gen, metrics) = generator(provider.clone());
        let err = gen
            .generate(DocumentKind::CoverLetter, &profile(), &GenerationContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), crate::error_code::ServiceErrorCode::ValidationError);
        assert_eq!(provider.calls(), 0);
        assert_eq!(metrics.api_calls(), 0);
    }

    #[test]
    fn test_default_section_count_without_template() {
        let m = DocumentMetrics::measure("one two", None);
        assert_eq!(m.sections_included, DEFAULT_SECTION_COUNT);
        assert_eq!(m.char_count, 7);
    }
}
