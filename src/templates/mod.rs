//! 文档模板模块：内置模板注册表与基于档案的模板选择规则。
//!
//! # Document Templates
//!
//! A [`DocumentTemplate`] is an immutable bundle of layout hints (sections,
//! tone, keywords, a length ceiling) that the generators interpolate into the
//! user prompt. The [`TemplateRegistry`] owns the built-in set and resolves
//! either an explicit template id or the selection rule.
//!
//! ## Built-in templates
//!
//! | Id | Name | Targets |
//! |----|------|---------|
//! | `tech_resume` | Technology Resume | industry = technology |
//! | `executive_resume` | Executive Resume | level = executive |
//! | `creative_portfolio` | Creative Portfolio Bio | explicit only |
//!
//! ## Selection
//!
//! Selection only applies to resumes. The first matching rule wins:
//! technology industry, then executive experience level. Anything else gets
//! no template.

use crate::types::{DocumentKind, ExperienceLevel, Industry, ProfileInput, Tone};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTemplate {
    pub id: String,
    pub name: String,
    pub industry: Option<Industry>,
    pub experience_level: Option<ExperienceLevel>,
    pub tone: Tone,
    pub sections: Vec<String>,
    pub max_length: usize,
    pub keywords: Vec<String>,
    pub custom_instructions: String,
}

impl DocumentTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tone: Tone) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            industry: None,
            experience_level: None,
            tone,
            sections: Vec::new(),
            max_length: 2000,
            keywords: Vec::new(),
            custom_instructions: String::new(),
        }
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = Some(level);
        self
    }

    pub fn with_sections(mut self, sections: &[&str]) -> Self {
        self.sections = sections.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_custom_instructions(mut self, text: impl Into<String>) -> Self {
        self.custom_instructions = text.into();
        self
    }
}

/// Lookup table of templates keyed by id.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, Arc<DocumentTemplate>>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(
            DocumentTemplate::new("tech_resume", "Technology Resume", Tone::Technical)
                .with_industry(Industry::Technology)
                .with_sections(&["Summary", "Technical Skills", "Experience", "Projects", "Education"])
                .with_max_length(2000)
                .with_keywords(&["agile", "scalable", "optimization", "architecture", "DevOps"]),
        );
        registry.register(
            DocumentTemplate::new("executive_resume", "Executive Resume", Tone::Executive)
                .with_experience_level(ExperienceLevel::Executive)
                .with_sections(&[
                    "Executive Summary",
                    "Leadership Experience",
                    "Strategic Achievements",
                    "Board Positions",
                    "Education",
                ])
                .with_max_length(2500)
                .with_keywords(&["leadership", "strategic", "transformation", "growth", "P&L"]),
        );
        registry.register(
            DocumentTemplate::new("creative_portfolio", "Creative Portfolio Bio", Tone::Creative)
                .with_sections(&["Creative Vision", "Notable Work", "Skills", "Recognition"])
                .with_max_length(1500)
                .with_keywords(&["innovative", "creative", "design", "visual", "conceptual"]),
        );
        registry
    }

    /// Insert or replace a template under its id.
    pub fn register(&mut self, template: DocumentTemplate) {
        self.templates.insert(template.id.clone(), Arc::new(template));
    }

    pub fn get(&self, id: &str) -> Option<Arc<DocumentTemplate>> {
        self.templates.get(id).cloned()
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Explicit id if it exists in the registry, otherwise the selection rule.
    ///
    /// An unknown explicit id falls through to the rule rather than failing.
    pub fn resolve(
        &self,
        kind: DocumentKind,
        profile: &ProfileInput,
        explicit: Option<&str>,
    ) -> Option<Arc<DocumentTemplate>> {
        explicit
            .and_then(|id| self.get(id))
            .or_else(|| select_template(kind, profile).and_then(|id| self.get(id)))
    }
}

/// Template id chosen for `kind` and `profile`, if any rule matches.
pub fn select_template(kind: DocumentKind, profile: &ProfileInput) -> Option<&'static str> {
    match kind {
        DocumentKind::Resume => {
            if profile.industry == Some(Industry::Technology) {
                Some("tech_resume")
            } else if profile.experience_level() == ExperienceLevel::Executive {
                Some("executive_resume")
            } else {
                None
            }
        }
        DocumentKind::CoverLetter
        | DocumentKind::ProfileOptimization
        | DocumentKind::InterviewPreparation => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(years: u8, industry: Option<Industry>) -> ProfileInput {
        let mut p = ProfileInput::new(
            "Director of Operations",
            years,
            "MBA",
            vec!["Operations".into()],
            "Ran logistics for a regional retailer",
        );
        p.industry = industry;
        p
    }

    #[test]
    fn test_technology_wins_over_executive() {
        let p = profile(12, Some(Industry::Technology));
        assert_eq!(select_template(DocumentKind::Resume, &p), Some("tech_resume"));
    }

    #[test]
    fn test_executive_level_selects_executive_template() {
        let p = profile(12, Some(Industry::Finance));
        assert_eq!(select_template(DocumentKind::Resume, &p), Some("executive_resume"));
        let p = profile(4, None).with_experience_level(ExperienceLevel::Executive);
        assert_eq!(select_template(DocumentKind::Resume, &p), Some("executive_resume"));
    }

    #[test]
    fn test_other_combinations_select_nothing() {
        assert_eq!(select_template(DocumentKind::Resume, &profile(4, Some(Industry::Finance))), None);
        assert_eq!(select_template(DocumentKind::Resume, &profile(20, None)), None);
        let tech = profile(12, Some(Industry::Technology));
        assert_eq!(select_template(DocumentKind::CoverLetter, &tech), None);
        assert_eq!(select_template(DocumentKind::InterviewPreparation, &tech), None);
    }

    #[test]
    fn test_explicit_template_takes_precedence() {
        let registry = TemplateRegistry::builtin();
        let p = profile(12, Some(Industry::Technology));
        let t = registry
            .resolve(DocumentKind::Resume, &p, Some("creative_portfolio"))
            .unwrap();
        assert_eq!(t.name, "Creative Portfolio Bio");

        let t = registry.resolve(DocumentKind::Resume, &p, Some("missing")).unwrap();
        assert_eq!(t.id, "tech_resume");

        let t = registry.resolve(DocumentKind::CoverLetter, &p, Some("executive_resume"));
        assert_eq!(t.map(|t| t.sections.len()), Some(5));
    }

    #[test]
    fn test_builtin_registry_contents() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(registry.ids(), vec!["creative_portfolio", "executive_resume", "tech_resume"]);
        let exec = registry.get("executive_resume").unwrap();
        assert_eq!(exec.max_length, 2500);
        assert_eq!(exec.keywords[4], "P&L");
    }
}
