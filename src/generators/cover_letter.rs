use super::{optional_line, template_block, GenerationContext, Prompt, PromptBuilder};
use crate::generators::prompts::{COVER_LETTER_STRATEGY, COVER_LETTER_SYSTEM};
use crate::templates::DocumentTemplate;
use crate::types::{DocumentKind, ProfileInput};
use crate::{Error, ErrorContext, Result};

/// Skills beyond this many are left out of the letter.
const STRENGTHS_SHOWN: usize = 5;

pub struct CoverLetterPrompt;

impl PromptBuilder for CoverLetterPrompt {
    fn kind(&self) -> DocumentKind {
        DocumentKind::CoverLetter
    }

    fn temperature(&self) -> f32 {
        0.8
    }

    fn check(&self, profile: &ProfileInput, _ctx: &GenerationContext) -> Result<()> {
        if !profile.has_target_role() {
            return Err(Error::validation_with_context(
                "Target position is required for cover letter generation",
                ErrorContext::new()
                    .with_field_path("profile.target_role")
                    .with_source("cover_letter_generator"),
            ));
        }
        Ok(())
    }

    fn build(
        &self,
        profile: &ProfileInput,
        ctx: &GenerationContext,
        template: Option<&DocumentTemplate>,
    ) -> Prompt {
        let strengths: Vec<&str> = profile
            .skills
            .iter()
            .take(STRENGTHS_SHOWN)
            .map(String::as_str)
            .collect();
        let company = ctx
            .company_info
            .as_deref()
            .map(|c| format!("\nCOMPANY INFORMATION:\n{}\n", c))
            .unwrap_or_default();
        let manager = ctx
            .hiring_manager
            .as_deref()
            .map(|m| format!("\nHIRING MANAGER: {}\n", m))
            .unwrap_or_default();

        let user = format!(
            "Write a {tone}, highly targeted cover letter for the {target} position.\n\
             {template}\n\
             CANDIDATE PROFILE:\n\
             - Current Role: {role} ({years} years)\n\
             - Key Strengths: {strengths}\n\
             - Career Goals: {goals}\n\
             {achievements}\n\
             JOB DESCRIPTION:\n\
             {job}\n\
             {company}{manager}\n\
             {strategy}",
            tone = profile.tone.as_str(),
            target = profile.target_role.as_deref().unwrap_or_default(),
            template = template.map(template_block).unwrap_or_default(),
            role = profile.current_role,
            years = profile.years_experience,
            strengths = strengths.join(", "),
            goals = profile.career_goals.as_deref().unwrap_or("Advancing to the next level"),
            achievements = optional_line("Notable Achievements", profile.achievements.as_deref()),
            job = ctx.job_description.as_deref().unwrap_or("Not provided"),
            company = company,
            manager = manager,
            strategy = COVER_LETTER_STRATEGY,
        );

        Prompt::new(COVER_LETTER_SYSTEM, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tone;

    fn profile() -> ProfileInput {
        ProfileInput::new(
            "Product Designer",
            6,
            "BA Design",
            (1..=7).map(|i| format!("skill{}", i)).collect(),
            "Designed onboarding flows for fintech apps",
        )
        .with_tone(Tone::Creative)
    }

    #[test]
    fn test_target_role_required() {
        let err = CoverLetterPrompt
            .check(&profile(), &GenerationContext::new())
            .unwrap_err();
        assert!(err.to_string().contains("profile.target_role"));
        assert!(CoverLetterPrompt
            .check(&profile().with_target_role("Design Lead"), &GenerationContext::new())
            .is_ok());
    }

    #[test]
    fn test_prompt_limits_strengths_and_names_manager() {
        let ctx = GenerationContext::new()
            .with_job_description("Lead our design system")
            .with_hiring_manager("Dana Reyes");
        let prompt = CoverLetterPrompt.build(&profile().with_target_role("Design Lead"), &ctx, None);
        assert!(prompt.user.starts_with("Write a creative, highly targeted cover letter for the Design Lead position."));
        assert!(prompt.user.contains("skill1, skill2, skill3, skill4, skill5\n"));
        assert!(!prompt.user.contains("skill6"));
        assert!(prompt.user.contains("HIRING MANAGER: Dana Reyes"));
        assert!(!prompt.user.contains("COMPANY INFORMATION"));
    }
}
