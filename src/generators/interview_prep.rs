use super::{template_block, GenerationContext, Prompt, PromptBuilder};
use crate::generators::prompts::{INTERVIEW_PREPARATION_DELIVERABLES, INTERVIEW_PREPARATION_SYSTEM};
use crate::templates::DocumentTemplate;
use crate::types::{DocumentKind, ProfileInput};

pub struct InterviewPrepPrompt;

impl PromptBuilder for InterviewPrepPrompt {
    fn kind(&self) -> DocumentKind {
        DocumentKind::InterviewPreparation
    }

    fn temperature(&self) -> f32 {
        0.6
    }

    fn build(
        &self,
        profile: &ProfileInput,
        ctx: &GenerationContext,
        template: Option<&DocumentTemplate>,
    ) -> Prompt {
        let company = ctx
            .company_info
            .as_deref()
            .map(|c| format!("COMPANY INFORMATION:\n{}\n", c))
            .unwrap_or_default();

        let user = format!(
            "Create comprehensive interview preparation for:\n\n\
             CANDIDATE: {role} with {years} years of experience\n\
             TARGET ROLE: {target}\n\
             EXPERIENCE LEVEL: {level}\n\
             KEY SKILLS: {skills}\n\
             {template}\n\
             JOB DESCRIPTION:\n\
             {job}\n\n\
             {company}\n\
             {deliverables}",
            role = profile.current_role,
            years = profile.years_experience,
            target = profile.target_role.as_deref().unwrap_or("Not specified"),
            level = profile.experience_level().as_str(),
            skills = profile.skills.join(", "),
            template = template.map(template_block).unwrap_or_default(),
            job = ctx.job_description.as_deref().unwrap_or("Not provided"),
            company = company,
            deliverables = INTERVIEW_PREPARATION_DELIVERABLES,
        );

        Prompt::new(INTERVIEW_PREPARATION_SYSTEM, user)
    }
}
