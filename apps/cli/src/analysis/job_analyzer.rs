//! Job Analyzer — extracts structured requirements from a raw job posting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::{JOB_ANALYSIS_PROMPT_TEMPLATE, JOB_ANALYSIS_SYSTEM};
use crate::errors::PipelineError;
use crate::llm_client::ModelClient;
use crate::models::job::JobPosting;

/// Technical requirements grouped the way recruiters group them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalRequirements {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub management: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoftSkillRequirements {
    #[serde(default)]
    pub interpersonal: Vec<String>,
    #[serde(default)]
    pub organizational: Vec<String>,
    #[serde(default)]
    pub leadership: Vec<String>,
}

/// Structured requirements extracted from a job posting by the model.
/// Category maps are ordered (`BTreeMap`) so serialization is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirements {
    pub required_qualifications: BTreeMap<String, Vec<String>>,
    pub key_responsibilities: BTreeMap<String, Vec<String>>,
    pub technical_requirements: TechnicalRequirements,
    pub soft_skills: SoftSkillRequirements,
    #[serde(default)]
    pub preferences: Option<BTreeMap<String, Vec<String>>>,
}

impl JobRequirements {
    /// Every requirement phrase across all categories, lowercased.
    /// Used by skill prioritization and validation coverage checks.
    pub fn all_requirement_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for list in self.required_qualifications.values() {
            terms.extend(list.iter().map(|s| s.to_lowercase()));
        }
        terms.extend(
            self.technical_requirements
                .technical
                .iter()
                .chain(self.technical_requirements.management.iter())
                .chain(self.technical_requirements.tools.iter())
                .map(|s| s.to_lowercase()),
        );
        terms.extend(
            self.soft_skills
                .interpersonal
                .iter()
                .chain(self.soft_skills.organizational.iter())
                .chain(self.soft_skills.leadership.iter())
                .map(|s| s.to_lowercase()),
        );
        terms
    }
}

/// Extracts ONLY explicit requirements from the job posting.
pub async fn analyze_job(
    job: &JobPosting,
    client: &ModelClient,
) -> Result<JobRequirements, PipelineError> {
    info!("Analyzing job: {} at {}", job.title, job.company);

    let prompt = JOB_ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_title}", &job.title)
        .replace("{job_company}", &job.company)
        .replace("{job_text}", &job.prompt_text());

    let requirements: JobRequirements = client.call_json(&prompt, JOB_ANALYSIS_SYSTEM).await?;

    info!(
        "Job analysis complete: {} qualification groups, {} responsibility groups, {} technical requirements",
        requirements.required_qualifications.len(),
        requirements.key_responsibilities.len(),
        requirements.technical_requirements.technical.len()
    );

    Ok(requirements)
}
