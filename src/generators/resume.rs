use super::{join_or, optional_line, template_block, GenerationContext, Prompt, PromptBuilder};
use crate::generators::prompts::{RESUME_REQUIREMENTS, RESUME_SYSTEM};
use crate::templates::DocumentTemplate;
use crate::types::{DocumentKind, ProfileInput};

pub struct ResumePrompt;

impl PromptBuilder for ResumePrompt {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Resume
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
        let industry = profile
            .industry
            .map(|i| format!(" in the {} industry", i.as_str()))
            .unwrap_or_default();
        let job = ctx
            .job_description
            .as_deref()
            .map(|jd| {
                format!(
                    "\nTARGET JOB DESCRIPTION:\n{}\n\nOptimize the resume for this specific role.\n",
                    jd
                )
            })
            .unwrap_or_default();

        let user = format!(
            "Create a compelling, ATS-optimized resume for a {role}{industry} with {years} years of \
             experience at the {level} level.\n\
             {template}\n\
             CANDIDATE PROFILE:\n\
             - Current Position: {role}\n\
             - Target Position: {target}\n\
             - Education: {education}\n\
             - Core Skills: {skills}\n\
             - Certifications: {certs}\n\
             - Languages: {languages}\n\
             - Location: {location}\n\
             - Experience Summary: {experience}\n\
             {achievements}{goals}{job}\n\
             {requirements}",
            role = profile.current_role,
            industry = industry,
            years = profile.years_experience,
            level = profile.experience_level().as_str(),
            template = template.map(template_block).unwrap_or_default(),
            target = profile.target_role.as_deref().unwrap_or("Similar or more senior role"),
            education = profile.education,
            skills = profile.skills.join(", "),
            certs = join_or(&profile.certifications, "None listed"),
            languages = join_or(&profile.languages, "English"),
            location = profile.location.as_deref().unwrap_or("Not specified"),
            experience = profile.experience,
            achievements = optional_line("Key Achievements", profile.achievements.as_deref()),
            goals = optional_line("Career Goals", profile.career_goals.as_deref()),
            job = job,
            requirements = RESUME_REQUIREMENTS,
        );

        Prompt::new(RESUME_SYSTEM, user)
    }
}
