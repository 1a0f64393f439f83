//! ATS keyword extraction — categorized, weighted keyword inventory.
//!
//! The flattened inventory is the keyword universe for matching and
//! validation: the matcher's matched/missing sets partition exactly this set.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::{ATS_PROMPT_TEMPLATE, ATS_SYSTEM};
use crate::errors::PipelineError;
use crate::llm_client::ModelClient;
use crate::models::job::JobPosting;

/// A single keyword weighted 1 (incidental) to 5 (core requirement).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordInfo {
    pub name: String,
    pub weight: u32,
}

/// Categorized keyword inventory extracted from the job posting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtsKeywords {
    #[serde(default)]
    pub technical_keywords: Vec<KeywordInfo>,
    #[serde(default)]
    pub soft_skills: Vec<KeywordInfo>,
    #[serde(default)]
    pub industry_terms: Vec<KeywordInfo>,
    #[serde(default)]
    pub certifications: Vec<KeywordInfo>,
    #[serde(default)]
    pub tools_and_technologies: Vec<KeywordInfo>,
}

impl AtsKeywords {
    /// The full keyword set, in category order.
    pub fn flatten(&self) -> Vec<&KeywordInfo> {
        self.technical_keywords
            .iter()
            .chain(self.soft_skills.iter())
            .chain(self.industry_terms.iter())
            .chain(self.certifications.iter())
            .chain(self.tools_and_technologies.iter())
            .collect()
    }

    pub fn total_count(&self) -> usize {
        self.flatten().len()
    }

    pub fn total_weight(&self) -> u32 {
        self.flatten().iter().map(|k| k.weight).sum()
    }
}

/// Extracts the ATS keyword inventory from the job posting.
pub async fn extract_keywords(
    job: &JobPosting,
    client: &ModelClient,
) -> Result<AtsKeywords, PipelineError> {
    info!("Extracting ATS keywords for {}", job.title);

    let prompt = ATS_PROMPT_TEMPLATE
        .replace("{job_title}", &job.title)
        .replace("{job_text}", &job.prompt_text());

    let keywords: AtsKeywords = client.call_json(&prompt, ATS_SYSTEM).await?;

    info!(
        "ATS extraction complete: {} keywords, total weight {}",
        keywords.total_count(),
        keywords.total_weight()
    );

    Ok(keywords)
}
