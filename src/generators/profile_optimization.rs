use super::{optional_line, template_block, GenerationContext, Prompt, PromptBuilder};
use crate::generators::prompts::{PROFILE_OPTIMIZATION_DELIVERABLES, PROFILE_OPTIMIZATION_SYSTEM};
use crate::templates::DocumentTemplate;
use crate::types::{DocumentKind, ProfileInput};

pub struct ProfileOptimizationPrompt;

impl PromptBuilder for ProfileOptimizationPrompt {
    fn kind(&self) -> DocumentKind {
        DocumentKind::ProfileOptimization
    }

    fn temperature(&self) -> f32 {
        0.7
    }

    fn build(
        &self,
        profile: &ProfileInput,
        _ctx: &GenerationContext,
        template: Option<&DocumentTemplate>,
    ) -> Prompt {
        let user = format!(
            "Create a comprehensive LinkedIn profile optimization for a {role} with {years} years of experience.\n\
             {template}\n\
             PROFILE DETAILS:\n\
             - Industry: {industry}\n\
             - Target Role: {target}\n\
             - Core Skills: {skills}\n\
             - Experience: {experience}\n\
             - Location: {location}\n\
             {achievements}{goals}\n\
             {deliverables}",
            role = profile.current_role,
            years = profile.years_experience,
            template = template.map(template_block).unwrap_or_default(),
            industry = profile.industry.map(|i| i.as_str()).unwrap_or("professional services"),
            target = profile.target_role.as_deref().unwrap_or("Senior position in the same field"),
            skills = profile.skills.join(", "),
            experience = profile.experience,
            location = profile.location.as_deref().unwrap_or("Major metropolitan area"),
            achievements = optional_line("Achievements", profile.achievements.as_deref()),
            goals = optional_line("Career Goals", profile.career_goals.as_deref()),
            deliverables = PROFILE_OPTIMIZATION_DELIVERABLES,
        );

        Prompt::new(PROFILE_OPTIMIZATION_SYSTEM, user)
    }
}
