//! Profile data and the closed enumerations used across generation.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const MAX_YEARS_EXPERIENCE: u8 = 50;
pub const MAX_SKILLS: usize = 50;
pub const MAX_ROLE_CHARS: usize = 100;
pub const MIN_EXPERIENCE_CHARS: usize = 10;

/// Writing register requested for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Creative,
    Executive,
    Technical,
    Academic,
    Entrepreneurial,
    Consultative,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Creative => "creative",
            Tone::Executive => "executive",
            Tone::Technical => "technical",
            Tone::Academic => "academic",
            Tone::Entrepreneurial => "entrepreneurial",
            Tone::Consultative => "consultative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Technology,
    Finance,
    Healthcare,
    Education,
    Marketing,
    Consulting,
    Manufacturing,
    Nonprofit,
    Government,
    Startup,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Technology => "technology",
            Industry::Finance => "finance",
            Industry::Healthcare => "healthcare",
            Industry::Education => "education",
            Industry::Marketing => "marketing",
            Industry::Consulting => "consulting",
            Industry::Manufacturing => "manufacturing",
            Industry::Nonprofit => "nonprofit",
            Industry::Government => "government",
            Industry::Startup => "startup",
        }
    }
}

/// Seniority band.
///
/// Bands are inclusive on the upper bound: 2 years is still entry level,
/// 3 years is mid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
    CSuite,
}

impl ExperienceLevel {
    pub fn from_years(years: u8) -> Self {
        match years {
            0..=2 => ExperienceLevel::Entry,
            3..=5 => ExperienceLevel::Mid,
            6..=10 => ExperienceLevel::Senior,
            11..=15 => ExperienceLevel::Executive,
            _ => ExperienceLevel::CSuite,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
            ExperienceLevel::CSuite => "c_suite",
        }
    }
}

/// The documents this service knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
    ProfileOptimization,
    InterviewPreparation,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Resume,
        DocumentKind::CoverLetter,
        DocumentKind::ProfileOptimization,
        DocumentKind::InterviewPreparation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover_letter",
            DocumentKind::ProfileOptimization => "profile_optimization",
            DocumentKind::InterviewPreparation => "interview_preparation",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "resume" => Ok(DocumentKind::Resume),
            "cover_letter" => Ok(DocumentKind::CoverLetter),
            "profile_optimization" | "linkedin" | "linkedin_bio" => {
                Ok(DocumentKind::ProfileOptimization)
            }
            "interview_preparation" | "interview_prep" | "interview" => {
                Ok(DocumentKind::InterviewPreparation)
            }
            other => Err(Error::validation_with_context(
                format!("unknown document kind '{}'", other),
                ErrorContext::new()
                    .with_field_path("document_kind")
                    .with_details("expected one of resume, cover_letter, profile_optimization, interview_preparation"),
            )),
        }
    }
}

/// The person a document is written for.
///
/// Deserialize from the request body, then call [`ProfileInput::validated`]
/// before handing it to a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub current_role: String,
    pub years_experience: u8,
    pub education: String,
    pub skills: Vec<String>,
    pub experience: String,
    #[serde(default)]
    pub achievements: Option<String>,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub industry: Option<Industry>,
    #[serde(default)]
    pub tone: Tone,
    /// Explicit override; derived from `years_experience` when absent.
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_range: Option<(u32, u32)>,
    #[serde(default)]
    pub career_goals: Option<String>,
}

impl ProfileInput {
    pub fn new(
        current_role: impl Into<String>,
        years_experience: u8,
        education: impl Into<String>,
        skills: Vec<String>,
        experience: impl Into<String>,
    ) -> Self {
        Self {
            current_role: current_role.into(),
            years_experience,
            education: education.into(),
            skills,
            experience: experience.into(),
            achievements: None,
            target_role: None,
            industry: None,
            tone: Tone::default(),
            experience_level: None,
            certifications: Vec::new(),
            languages: Vec::new(),
            location: None,
            salary_range: None,
            career_goals: None,
        }
    }

    pub fn with_target_role(mut self, role: impl Into<String>) -> Self {
        self.target_role = Some(role.into());
        self
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = Some(level);
        self
    }

    pub fn with_achievements(mut self, achievements: impl Into<String>) -> Self {
        self.achievements = Some(achievements.into());
        self
    }

    pub fn with_career_goals(mut self, goals: impl Into<String>) -> Self {
        self.career_goals = Some(goals.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_certifications(mut self, certifications: Vec<String>) -> Self {
        self.certifications = certifications;
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_salary_range(mut self, min: u32, max: u32) -> Self {
        self.salary_range = Some((min, max));
        self
    }

    pub fn experience_level(&self) -> ExperienceLevel {
        self.experience_level
            .unwrap_or_else(|| ExperienceLevel::from_years(self.years_experience))
    }

    pub fn has_target_role(&self) -> bool {
        self.target_role
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false)
    }

    /// Clean and check every field, returning the normalized profile.
    ///
    /// Skills are trimmed, blank entries dropped and case-insensitive
    /// duplicates removed keeping the first spelling. Blank optional text
    /// fields become `None`.
    pub fn validated(mut self) -> Result<Self> {
        self.current_role = self.current_role.trim().to_string();
        let role_chars = self.current_role.chars().count();
        if role_chars == 0 || role_chars > MAX_ROLE_CHARS {
            return Err(invalid(
                "current_role",
                format!("must be between 1 and {} characters", MAX_ROLE_CHARS),
            ));
        }

        if self.years_experience > MAX_YEARS_EXPERIENCE {
            return Err(invalid(
                "years_experience",
                format!("must be between 0 and {}", MAX_YEARS_EXPERIENCE),
            ));
        }

        self.education = self.education.trim().to_string();
        if self.education.is_empty() {
            return Err(invalid("education", "must not be empty"));
        }

        self.experience = self.experience.trim().to_string();
        if self.experience.chars().count() < MIN_EXPERIENCE_CHARS {
            return Err(invalid(
                "experience",
                format!("must be at least {} characters", MIN_EXPERIENCE_CHARS),
            ));
        }

        self.skills = clean_skills(&self.skills);
        if self.skills.is_empty() || self.skills.len() > MAX_SKILLS {
            return Err(invalid(
                "skills",
                format!("must contain between 1 and {} distinct entries", MAX_SKILLS),
            ));
        }

        if let Some((min, max)) = self.salary_range {
            if min > max {
                return Err(invalid("salary_range", "minimum exceeds maximum"));
            }
        }

        for field in [
            &mut self.achievements,
            &mut self.target_role,
            &mut self.location,
            &mut self.career_goals,
        ] {
            *field = field
                .take()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
        }
        self.certifications.retain(|c| !c.trim().is_empty());
        self.languages.retain(|l| !l.trim().is_empty());

        Ok(self)
    }
}

fn clean_skills(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn invalid(field: &str, details: impl Into<String>) -> Error {
    Error::validation_with_context(
        format!("invalid profile field '{}'", field),
        ErrorContext::new()
            .with_field_path(format!("profile.{}", field))
            .with_details(details)
            .with_source("profile_validator"),
    )
}
