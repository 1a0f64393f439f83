//! Cover letter generation — one model call, grounded in the match report.
//!
//! The letter must address the matcher's gap list professionally rather than
//! hiding it; the prompt carries the top gaps explicitly.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::job_analyzer::JobRequirements;
use crate::errors::PipelineError;
use crate::generation::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};
use crate::llm_client::ModelClient;
use crate::matching::MatchResult;
use crate::models::job::JobPosting;
use crate::models::profile::CandidateProfile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetter {
    pub greeting: String,
    pub opening_paragraph: String,
    pub body_paragraphs: Vec<String>,
    pub closing_paragraph: String,
    pub signature: String,
    #[serde(default)]
    pub keywords_used: Vec<String>,
}

impl CoverLetter {
    /// Structural issues that make the letter unusable as a document.
    pub fn structural_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.greeting.trim().is_empty() {
            issues.push("greeting is empty".to_string());
        }
        if self.opening_paragraph.trim().is_empty() {
            issues.push("opening paragraph is empty".to_string());
        }
        if self.body_paragraphs.iter().all(|p| p.trim().is_empty()) {
            issues.push("no body paragraphs".to_string());
        }
        if self.closing_paragraph.trim().is_empty() {
            issues.push("closing paragraph is empty".to_string());
        }
        if self.signature.trim().is_empty() {
            issues.push("signature is empty".to_string());
        }
        issues
    }
}

/// Generates the cover letter for the posting.
pub async fn generate_cover_letter(
    profile: &CandidateProfile,
    requirements: &JobRequirements,
    match_result: &MatchResult,
    job: &JobPosting,
    client: &ModelClient,
) -> Result<CoverLetter, PipelineError> {
    info!(
        "Generating cover letter for {} at {}",
        job.title, job.company
    );

    let gaps: Vec<String> = match_result
        .top_gaps(3)
        .iter()
        .map(|g| g.keyword.clone())
        .collect();

    let prompt = COVER_LETTER_PROMPT_TEMPLATE
        .replace("{company}", &job.company)
        .replace("{job_title}", &job.title)
        .replace("{gaps}", &gaps.join(", "))
        .replace(
            "{profile_json}",
            &serde_json::to_string(profile).map_err(|e| {
                PipelineError::Generation(format!("failed to serialize profile: {e}"))
            })?,
        )
        .replace(
            "{requirements_json}",
            &serde_json::to_string(requirements).map_err(|e| {
                PipelineError::Generation(format!("failed to serialize requirements: {e}"))
            })?,
        )
        .replace(
            "{match_json}",
            &serde_json::to_string(match_result).map_err(|e| {
                PipelineError::Generation(format!("failed to serialize match result: {e}"))
            })?,
        );

    let letter: CoverLetter = client.call_json(&prompt, COVER_LETTER_SYSTEM).await?;

    let issues = letter.structural_issues();
    if !issues.is_empty() {
        return Err(PipelineError::Generation(format!(
            "cover letter failed structural checks: {}",
            issues.join("; ")
        )));
    }

    info!(
        "Cover letter generated: {} body paragraphs, {} keywords used",
        letter.body_paragraphs.len(),
        letter.keywords_used.len()
    );

    Ok(letter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{scripted_client, ScriptedBackend};
    use crate::matching::MissingKeyword;
    use crate::models::profile::{PersonalInformation, SkillSet};
    use std::sync::Arc;

    const LETTER_JSON: &str = r#"{
        "greeting": "Dear Hiring Team,",
        "opening_paragraph": "I am writing to apply for the Platform Engineer role.",
        "body_paragraphs": [
            "At Analytical Engines I operated Kubernetes clusters across three regions.",
            "While I have not yet worked with Kafka, my streaming background transfers directly."
        ],
        "closing_paragraph": "I would welcome the chance to discuss the role.",
        "signature": "Sincerely,\nAda Lovelace",
        "keywords_used": ["Kubernetes", "streaming"]
    }"#;

    fn make_profile() -> CandidateProfile {
        CandidateProfile {
            personal_information: PersonalInformation {
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                contact: Default::default(),
                online_presence: Default::default(),
            },
            professional_experience: vec![],
            skills: SkillSet::default(),
            certifications: vec![],
            education: vec![],
            languages: vec![],
            work_preferences: Default::default(),
        }
    }

    fn make_match() -> MatchResult {
        MatchResult {
            score: 65,
            matched: vec![],
            missing: vec![MissingKeyword {
                keyword: "Kafka".to_string(),
                weight: 4,
            }],
            key_strengths: vec![],
            areas_for_improvement: vec![],
            recommendations: vec![],
            scorer_backend: "keyword".to_string(),
        }
    }

    fn make_job() -> JobPosting {
        JobPosting {
            company: "Initech".to_string(),
            title: "Platform Engineer".to_string(),
            description: String::new(),
            requirements: vec![],
            raw_text: String::new(),
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

    #[test]
    fn test_letter_contract_deserializes() {
        let letter: CoverLetter = serde_json::from_str(LETTER_JSON).unwrap();
        assert_eq!(letter.body_paragraphs.len(), 2);
        assert!(letter.signature.contains("Ada"));
    }

    #[test]
    fn test_structural_issues_on_empty_letter() {
        let letter = CoverLetter {
            greeting: String::new(),
            opening_paragraph: String::new(),
            body_paragraphs: vec![],
            closing_paragraph: String::new(),
            signature: String::new(),
            keywords_used: vec![],
        };
        let issues = letter.structural_issues();
        assert_eq!(issues.len(), 5);
    }

    #[test]
    fn test_complete_letter_has_no_structural_issues() {
        let letter: CoverLetter = serde_json::from_str(LETTER_JSON).unwrap();
        assert!(letter.structural_issues().is_empty());
    }

    #[tokio::test]
    async fn test_generate_cover_letter_returns_parsed_letter() {
        let backend = Arc::new(ScriptedBackend::new(vec![LETTER_JSON]));
        let client = scripted_client(backend.clone());

        let letter = generate_cover_letter(
            &make_profile(),
            &empty_requirements(),
            &make_match(),
            &make_job(),
            &client,
        )
        .await
        .unwrap();

        assert_eq!(letter.greeting, "Dear Hiring Team,");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_letter_is_a_generation_error() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            r#"{"greeting": "", "opening_paragraph": "", "body_paragraphs": [], "closing_paragraph": "", "signature": ""}"#,
        ]));
        let client = scripted_client(backend);

        let err = generate_cover_letter(
            &make_profile(),
            &empty_requirements(),
            &make_match(),
            &make_job(),
            &client,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::Generation(_)));
    }
}
