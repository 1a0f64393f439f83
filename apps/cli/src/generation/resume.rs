//! Resume generation — builds the tailored resume in two model passes.
//!
//! Pass 1 rewrites experience bullets toward the job while preserving every
//! entry (count preservation: if the model drops or invents entries, the
//! originals are restored verbatim). Pass 2 writes the first-person summary
//! over the assembled resume.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::ats::AtsKeywords;
use crate::analysis::job_analyzer::JobRequirements;
use crate::errors::PipelineError;
use crate::generation::prompts::{
    ENHANCE_PROMPT_TEMPLATE, ENHANCE_SYSTEM, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM,
};
use crate::llm_client::prompts::TRUTHFULNESS_INSTRUCTION;
use crate::llm_client::ModelClient;
use crate::matching::MatchResult;
use crate::models::profile::{CandidateProfile, Certification, WorkExperience};

/// Max attempts for the summary pass when the model returns a blank summary.
const MAX_SUMMARY_RETRIES: u32 = 2;

/// Resume skills regrouped for output: management becomes "other".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeSkills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub other: Vec<String>,
}

/// The tailored resume handed to validation and rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredResume {
    pub name: String,
    pub summary: String,
    pub skills: ResumeSkills,
    pub work_experience: Vec<WorkExperience>,
    pub certifications: Vec<Certification>,
}

impl TailoredResume {
    /// Flat lowercase text of the whole resume, for keyword coverage checks.
    pub fn full_text(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.name);
        text.push(' ');
        text.push_str(&self.summary);
        for skill in self
            .skills
            .technical
            .iter()
            .chain(self.skills.soft.iter())
            .chain(self.skills.other.iter())
        {
            text.push(' ');
            text.push_str(skill);
        }
        for exp in &self.work_experience {
            text.push(' ');
            text.push_str(&exp.position);
            text.push(' ');
            text.push_str(&exp.company);
            for r in &exp.responsibilities {
                text.push(' ');
                text.push_str(r);
            }
            for s in &exp.skills_acquired {
                text.push(' ');
                text.push_str(s);
            }
        }
        for cert in &self.certifications {
            text.push(' ');
            text.push_str(&cert.name);
        }
        text.to_lowercase()
    }
}

/// One rewritten experience entry, aligned by index with the profile.
#[derive(Debug, Deserialize)]
struct EnhancedEntry {
    #[serde(default)]
    responsibilities: Vec<String>,
    #[serde(default)]
    skills_acquired: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

/// Generates the tailored resume.
///
/// Structural checks after assembly: non-empty name, at least one experience
/// entry, non-empty summary. Failing them after the retry budget is a
/// `GenerationError`.
pub async fn generate_resume(
    profile: &CandidateProfile,
    requirements: &JobRequirements,
    match_result: &MatchResult,
    keywords: &AtsKeywords,
    client: &ModelClient,
) -> Result<TailoredResume, PipelineError> {
    info!(
        "Generating resume for {} ({} experience entries)",
        profile.full_name(),
        profile.professional_experience.len()
    );

    let mut resume = build_base_resume(profile);

    if resume.name.trim().is_empty() {
        return Err(PipelineError::Generation(
            "profile yields an empty candidate name".to_string(),
        ));
    }
    if resume.work_experience.is_empty() {
        return Err(PipelineError::Generation(
            "profile yields no work experience to tailor".to_string(),
        ));
    }

    let enhanced =
        enhance_experiences(&resume.work_experience, requirements, keywords, client).await?;
    resume.work_experience = enhanced;

    let summary = generate_summary(&resume, requirements, match_result, client).await?;
    resume.summary = summary;

    info!(
        "Resume generated: {} entries, {} technical skills listed",
        resume.work_experience.len(),
        resume.skills.technical.len()
    );

    Ok(resume)
}

/// Deterministic assembly from the profile — everything except the summary
/// and the rewritten bullets.
fn build_base_resume(profile: &CandidateProfile) -> TailoredResume {
    TailoredResume {
        name: profile.full_name(),
        summary: String::new(),
        skills: ResumeSkills {
            technical: profile.skills.technical.clone(),
            soft: profile.skills.soft.clone(),
            other: profile.skills.management.clone(),
        },
        work_experience: profile.professional_experience.clone(),
        certifications: profile.certifications.clone(),
    }
}

/// Pass 1: rewrite responsibilities toward the job, one model call for all
/// entries. Count preservation: a response that does not align one-to-one
/// with the input keeps the original entries.
async fn enhance_experiences(
    experiences: &[WorkExperience],
    requirements: &JobRequirements,
    keywords: &AtsKeywords,
    client: &ModelClient,
) -> Result<Vec<WorkExperience>, PipelineError> {
    let prompt = ENHANCE_PROMPT_TEMPLATE
        .replace("{truthfulness}", TRUTHFULNESS_INSTRUCTION)
        .replace(
            "{experiences_json}",
            &serde_json::to_string_pretty(experiences).map_err(|e| {
                PipelineError::Generation(format!("failed to serialize experiences: {e}"))
            })?,
        )
        .replace(
            "{requirements_json}",
            &serde_json::to_string(requirements).map_err(|e| {
                PipelineError::Generation(format!("failed to serialize requirements: {e}"))
            })?,
        )
        .replace(
            "{keywords_json}",
            &serde_json::to_string(keywords).map_err(|e| {
                PipelineError::Generation(format!("failed to serialize keywords: {e}"))
            })?,
        );

    let enhanced: Vec<EnhancedEntry> = client.call_json(&prompt, ENHANCE_SYSTEM).await?;

    if enhanced.len() != experiences.len() {
        warn!(
            "Experience count mismatch after enhancement ({} in, {} out) — keeping originals",
            experiences.len(),
            enhanced.len()
        );
        return Ok(experiences.to_vec());
    }

    Ok(experiences
        .iter()
        .zip(enhanced)
        .map(|(original, rewrite)| {
            let mut entry = original.clone();
            // Keep originals when the model returns an empty rewrite.
            if !rewrite.responsibilities.is_empty() {
                entry.responsibilities = rewrite.responsibilities;
            }
            if !rewrite.skills_acquired.is_empty() {
                entry.skills_acquired = rewrite.skills_acquired;
            }
            entry
        })
        .collect())
}

/// Pass 2: first-person summary over the assembled resume.
async fn generate_summary(
    resume: &TailoredResume,
    requirements: &JobRequirements,
    match_result: &MatchResult,
    client: &ModelClient,
) -> Result<String, PipelineError> {
    let prompt = SUMMARY_PROMPT_TEMPLATE
        .replace(
            "{resume_json}",
            &serde_json::to_string(resume).map_err(|e| {
                PipelineError::Generation(format!("failed to serialize resume: {e}"))
            })?,
        )
        .replace(
            "{requirements_json}",
            &serde_json::to_string(requirements).map_err(|e| {
                PipelineError::Generation(format!("failed to serialize requirements: {e}"))
            })?,
        )
        .replace(
            "{strengths_json}",
            &serde_json::to_string(&match_result.key_strengths).map_err(|e| {
                PipelineError::Generation(format!("failed to serialize strengths: {e}"))
            })?,
        );

    for attempt in 0..=MAX_SUMMARY_RETRIES {
        let response: SummaryResponse = client.call_json(&prompt, SUMMARY_SYSTEM).await?;
        let summary = response.summary.trim().to_string();
        if !summary.is_empty() {
            return Ok(summary);
        }
        warn!(
            "Summary attempt {}/{} returned blank text",
            attempt + 1,
            MAX_SUMMARY_RETRIES + 1
        );
    }

    Err(PipelineError::Generation(format!(
        "summary generation returned blank text after {} attempts",
        MAX_SUMMARY_RETRIES + 1
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{scripted_client, ScriptedBackend};
    use crate::models::profile::{PersonalInformation, SkillSet};
    use std::sync::Arc;

    fn make_profile(entries: usize) -> CandidateProfile {
        CandidateProfile {
            personal_information: PersonalInformation {
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                contact: Default::default(),
                online_presence: Default::default(),
            },
            professional_experience: (0..entries)
                .map(|i| WorkExperience {
                    company: format!("Company {i}"),
                    position: "Engineer".to_string(),
                    employment_period: String::new(),
                    location: String::new(),
                    industry: String::new(),
                    responsibilities: vec![format!("Did original work {i}")],
                    skills_acquired: vec!["Rust".to_string()],
                })
                .collect(),
            skills: SkillSet {
                technical: vec!["Rust".to_string()],
                management: vec!["Planning".to_string()],
                soft: vec!["Mentoring".to_string()],
            },
            certifications: vec![],
            education: vec![],
            languages: vec![],
            work_preferences: Default::default(),
        }
    }

    fn empty_requirements() -> JobRequirements {
        serde_json::from_str(
            r#"{
                "required_qualifications": {},
                "key_responsibilities": {},
                "technical_requirements": {"technical": [], "management": [], "tools": []},
                "soft_skills": {"interpersonal": [], "organizational": [], "leadership": []}
            }"#,
        )
        .unwrap()
    }

    fn empty_match() -> MatchResult {
        MatchResult {
            score: 80,
            matched: vec![],
            missing: vec![],
            key_strengths: vec!["Rust depth".to_string()],
            areas_for_improvement: vec![],
            recommendations: vec![],
            scorer_backend: "keyword".to_string(),
        }
    }

    #[test]
    fn test_base_resume_maps_management_to_other() {
        let resume = build_base_resume(&make_profile(1));
        assert_eq!(resume.skills.other, vec!["Planning"]);
        assert_eq!(resume.skills.technical, vec!["Rust"]);
        assert_eq!(resume.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_generate_resume_applies_enhanced_bullets() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            r#"[{"responsibilities": ["Shipped the tailored work"], "skills_acquired": ["Rust", "Kubernetes"]}]"#,
            r#"{"summary": "I build reliable systems in Rust."}"#,
        ]));
        let client = scripted_client(backend.clone());

        let resume = generate_resume(
            &make_profile(1),
            &empty_requirements(),
            &empty_match(),
            &AtsKeywords::default(),
            &client,
        )
        .await
        .unwrap();

        assert_eq!(
            resume.work_experience[0].responsibilities,
            vec!["Shipped the tailored work"]
        );
        assert_eq!(resume.summary, "I build reliable systems in Rust.");
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_count_mismatch_restores_original_entries() {
        // Model returns two entries for a three-entry profile.
        let backend = Arc::new(ScriptedBackend::new(vec![
            r#"[{"responsibilities": ["A"]}, {"responsibilities": ["B"]}]"#,
            r#"{"summary": "I am a careful engineer."}"#,
        ]));
        let client = scripted_client(backend.clone());
        let profile = make_profile(3);

        let resume = generate_resume(
            &profile,
            &empty_requirements(),
            &empty_match(),
            &AtsKeywords::default(),
            &client,
        )
        .await
        .unwrap();

        assert_eq!(resume.work_experience.len(), 3);
        assert_eq!(
            resume.work_experience[0].responsibilities,
            vec!["Did original work 0"]
        );
    }

    #[tokio::test]
    async fn test_blank_summary_exhausts_retries_into_generation_error() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            r#"[{"responsibilities": ["Work"]}]"#,
            r#"{"summary": ""}"#,
            r#"{"summary": "  "}"#,
            r#"{"summary": ""}"#,
        ]));
        let client = scripted_client(backend.clone());

        let err = generate_resume(
            &make_profile(1),
            &empty_requirements(),
            &empty_match(),
            &AtsKeywords::default(),
            &client,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::Generation(_)));
        assert_eq!(backend.calls(), 1 + MAX_SUMMARY_RETRIES + 1);
    }

    #[tokio::test]
    async fn test_empty_rewrite_keeps_original_bullets() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            r#"[{"responsibilities": [], "skills_acquired": []}]"#,
            r#"{"summary": "Summary text."}"#,
        ]));
        let client = scripted_client(backend);

        let resume = generate_resume(
            &make_profile(1),
            &empty_requirements(),
            &empty_match(),
            &AtsKeywords::default(),
            &client,
        )
        .await
        .unwrap();

        assert_eq!(
            resume.work_experience[0].responsibilities,
            vec!["Did original work 0"]
        );
    }

    #[test]
    fn test_full_text_covers_all_sections() {
        let mut resume = build_base_resume(&make_profile(1));
        resume.summary = "Distributed systems specialist".to_string();
        let text = resume.full_text();
        assert!(text.contains("ada lovelace"));
        assert!(text.contains("distributed systems specialist"));
        assert!(text.contains("company 0"));
        assert!(text.contains("rust"));
    }
}
