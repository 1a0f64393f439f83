//! Match scorers — pluggable, trait-based comparison of profile vs job.
//!
//! Default: `KeywordMatchScorer` (pure-Rust, deterministic, fully testable).
//! Optional: `LlmMatchScorer` (narrative strengths/gaps via the model; keeps
//! the deterministic matched/missing partition).
//!
//! The workflow holds an `Arc<dyn MatchScorer>`, chosen at startup.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::analysis::ats::AtsKeywords;
use crate::analysis::job_analyzer::JobRequirements;
use crate::errors::PipelineError;
use crate::llm_client::ModelClient;
use crate::matching::prompts::{MATCH_NARRATIVE_PROMPT_TEMPLATE, MATCH_NARRATIVE_SYSTEM};
use crate::matching::{MatchResult, MatchedKeyword, MissingKeyword};
use crate::models::profile::CandidateProfile;

/// The match scorer seam. Implement to swap backends without touching the
/// workflow or either generator.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(
        &self,
        profile: &CandidateProfile,
        requirements: &JobRequirements,
        keywords: &AtsKeywords,
    ) -> Result<MatchResult, PipelineError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordMatchScorer — deterministic default
// ────────────────────────────────────────────────────────────────────────────

/// Pure-Rust keyword scorer. No model call.
///
/// Algorithm, per keyword in the flattened ATS inventory:
/// 1. exact skill or certification match (case-insensitive) → strength 1.0
/// 2. substring match in any experience entry's text → strength 0.6
/// 3. otherwise → missing
/// score = Σ(strength × weight) / Σ(weight) × 100, rounded.
pub struct KeywordMatchScorer;

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score(
        &self,
        profile: &CandidateProfile,
        requirements: &JobRequirements,
        keywords: &AtsKeywords,
    ) -> Result<MatchResult, PipelineError> {
        let result = compute_keyword_match(profile, requirements, keywords);
        info!(
            "Profile match (keyword backend): {}/100, {} matched, {} missing",
            result.score,
            result.matched.len(),
            result.missing.len()
        );
        Ok(result)
    }
}

pub(crate) fn compute_keyword_match(
    profile: &CandidateProfile,
    _requirements: &JobRequirements,
    keywords: &AtsKeywords,
) -> MatchResult {
    let inventory = keywords.flatten();

    if inventory.is_empty() {
        return MatchResult {
            score: 0,
            matched: vec![],
            missing: vec![],
            key_strengths: vec![],
            areas_for_improvement: vec![],
            recommendations: vec![
                "No ATS keywords were extracted from the posting — cannot score fit.".to_string(),
            ],
            scorer_backend: "keyword".to_string(),
        };
    }

    let skill_index = profile.skill_index();
    let cert_index: Vec<String> = profile
        .certifications
        .iter()
        .map(|c| c.name.to_lowercase())
        .collect();
    let experience_texts = profile.experience_texts();

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut total_weight = 0.0_f32;
    let mut total_score = 0.0_f32;

    for keyword in &inventory {
        let needle = keyword.name.to_lowercase();
        total_weight += keyword.weight as f32;

        let (strength, evidence) = if skill_index.iter().any(|s| s == &needle) {
            (1.0, "skills".to_string())
        } else if cert_index.iter().any(|c| c == &needle) {
            (1.0, "certifications".to_string())
        } else if let Some((company, _)) = experience_texts
            .iter()
            .find(|(_, text)| text.contains(&needle))
        {
            (0.6, format!("experience at {company}"))
        } else {
            (0.0, String::new())
        };

        if strength > 0.0 {
            total_score += strength * keyword.weight as f32;
            matched.push(MatchedKeyword {
                keyword: keyword.name.clone(),
                evidence,
                strength,
                weight: keyword.weight,
            });
        } else {
            missing.push(MissingKeyword {
                keyword: keyword.name.clone(),
                weight: keyword.weight,
            });
        }
    }

    let score = if total_weight > 0.0 {
        ((total_score / total_weight) * 100.0).round() as u32
    } else {
        0
    };

    let key_strengths = build_strengths(&matched);
    let areas_for_improvement = build_improvements(&missing);
    let recommendations = build_recommendations(score, &missing);

    MatchResult {
        score,
        matched,
        missing,
        key_strengths,
        areas_for_improvement,
        recommendations,
        scorer_backend: "keyword".to_string(),
    }
}

/// Top matched keywords by weight, phrased as strengths.
fn build_strengths(matched: &[MatchedKeyword]) -> Vec<String> {
    let mut sorted: Vec<&MatchedKeyword> = matched.iter().collect();
    sorted.sort_by(|a, b| b.weight.cmp(&a.weight));
    sorted
        .iter()
        .take(5)
        .map(|m| format!("{} (covered by {})", m.keyword, m.evidence))
        .collect()
}

fn build_improvements(missing: &[MissingKeyword]) -> Vec<String> {
    let mut sorted: Vec<&MissingKeyword> = missing.iter().collect();
    sorted.sort_by(|a, b| b.weight.cmp(&a.weight));
    sorted
        .iter()
        .take(5)
        .map(|m| format!("No profile evidence for '{}'", m.keyword))
        .collect()
}

fn build_recommendations(score: u32, missing: &[MissingKeyword]) -> Vec<String> {
    let top_gaps: Vec<&str> = missing.iter().take(3).map(|g| g.keyword.as_str()).collect();

    if score >= 80 {
        vec!["Strong fit. The profile directly covers the key requirements.".to_string()]
    } else if score >= 60 {
        vec![format!(
            "Moderate fit ({score}/100). Consider adding profile evidence for: {}.",
            top_gaps.join(", ")
        )]
    } else {
        vec![format!(
            "Low fit ({score}/100). Significant gaps: {}. Tailor the profile or reconsider applying.",
            top_gaps.join(", ")
        )]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmMatchScorer — narrative augmentation
// ────────────────────────────────────────────────────────────────────────────

/// Narrative fields returned by the model. Matched/missing stay deterministic.
#[derive(Debug, Deserialize)]
struct MatchNarrative {
    key_strengths: Vec<String>,
    areas_for_improvement: Vec<String>,
    recommendations: Vec<String>,
}

/// Semantic scorer: runs the deterministic keyword partition first, then asks
/// the model for narrative strengths, improvement areas, and recommendations.
pub struct LlmMatchScorer {
    client: ModelClient,
}

impl LlmMatchScorer {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MatchScorer for LlmMatchScorer {
    async fn score(
        &self,
        profile: &CandidateProfile,
        requirements: &JobRequirements,
        keywords: &AtsKeywords,
    ) -> Result<MatchResult, PipelineError> {
        let mut result = compute_keyword_match(profile, requirements, keywords);

        let prompt = MATCH_NARRATIVE_PROMPT_TEMPLATE
            .replace(
                "{requirements_json}",
                &serde_json::to_string(requirements).map_err(|e| {
                    PipelineError::Generation(format!("failed to serialize requirements: {e}"))
                })?,
            )
            .replace(
                "{profile_json}",
                &serde_json::to_string(profile).map_err(|e| {
                    PipelineError::Generation(format!("failed to serialize profile: {e}"))
                })?,
            )
            .replace(
                "{partition_json}",
                &serde_json::to_string(&serde_json::json!({
                    "score": result.score,
                    "matched": result.matched,
                    "missing": result.missing,
                }))
                .map_err(|e| {
                    PipelineError::Generation(format!("failed to serialize partition: {e}"))
                })?,
            );

        let narrative: MatchNarrative =
            self.client.call_json(&prompt, MATCH_NARRATIVE_SYSTEM).await?;

        result.key_strengths = narrative.key_strengths;
        result.areas_for_improvement = narrative.areas_for_improvement;
        result.recommendations = narrative.recommendations;
        result.scorer_backend = "llm".to_string();

        info!(
            "Profile match (llm backend): {}/100, {} strengths",
            result.score,
            result.key_strengths.len()
        );

        Ok(result)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ats::KeywordInfo;
    use crate::llm_client::testing::{scripted_client, ScriptedBackend};
    use crate::models::profile::{
        Certification, PersonalInformation, SkillSet, WorkExperience,
    };
    use std::collections::HashSet;
    use std::sync::Arc;

    fn make_profile() -> CandidateProfile {
        CandidateProfile {
            personal_information: PersonalInformation {
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                contact: Default::default(),
                online_presence: Default::default(),
            },
            professional_experience: vec![WorkExperience {
                company: "Analytical Engines Ltd".to_string(),
                position: "Senior Engineer".to_string(),
                employment_period: "2020/01 - present".to_string(),
                location: "London".to_string(),
                industry: "Computing".to_string(),
                responsibilities: vec![
                    "Operated Kubernetes clusters across three regions".to_string(),
                ],
                skills_acquired: vec!["Terraform".to_string()],
            }],
            skills: SkillSet {
                technical: vec!["Rust".to_string(), "PostgreSQL".to_string()],
                management: vec![],
                soft: vec!["communication".to_string()],
            },
            certifications: vec![Certification {
                name: "CKA".to_string(),
                description: String::new(),
                issuer: String::new(),
                date_obtained: "2023-04".to_string(),
            }],
            education: vec![],
            languages: vec![],
            work_preferences: Default::default(),
        }
    }

    fn make_keywords(entries: Vec<(&str, u32)>) -> AtsKeywords {
        AtsKeywords {
            technical_keywords: entries
                .into_iter()
                .map(|(name, weight)| KeywordInfo {
                    name: name.to_string(),
                    weight,
                })
                .collect(),
            ..Default::default()
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
    fn test_exact_skill_match_has_full_strength() {
        let result = compute_keyword_match(
            &make_profile(),
            &empty_requirements(),
            &make_keywords(vec![("Rust", 5)]),
        );
        assert_eq!(result.score, 100);
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].strength, 1.0);
        assert_eq!(result.matched[0].evidence, "skills");
    }

    #[test]
    fn test_certification_match_has_full_strength() {
        let result = compute_keyword_match(
            &make_profile(),
            &empty_requirements(),
            &make_keywords(vec![("CKA", 2)]),
        );
        assert_eq!(result.matched[0].evidence, "certifications");
        assert_eq!(result.matched[0].strength, 1.0);
    }

    #[test]
    fn test_experience_text_match_is_partial() {
        let result = compute_keyword_match(
            &make_profile(),
            &empty_requirements(),
            &make_keywords(vec![("Kubernetes", 4)]),
        );
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].strength, 0.6);
        assert!(result.matched[0].evidence.contains("Analytical Engines"));
        // 0.6 * 4 / 4 * 100 = 60
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_unmatched_keyword_lands_in_missing() {
        let result = compute_keyword_match(
            &make_profile(),
            &empty_requirements(),
            &make_keywords(vec![("COBOL", 3)]),
        );
        assert!(result.matched.is_empty());
        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.missing[0].keyword, "COBOL");
        assert_eq!(result.score, 0);
    }

    /// matched ∪ missing must equal the flattened inventory, disjointly.
    #[test]
    fn test_matched_and_missing_partition_the_inventory() {
        let keywords = make_keywords(vec![
            ("Rust", 5),
            ("Kubernetes", 4),
            ("COBOL", 3),
            ("communication", 2),
            ("Fortran", 1),
        ]);
        let result =
            compute_keyword_match(&make_profile(), &empty_requirements(), &keywords);

        let matched: HashSet<&str> = result.matched.iter().map(|m| m.keyword.as_str()).collect();
        let missing: HashSet<&str> = result.missing.iter().map(|m| m.keyword.as_str()).collect();
        let inventory: HashSet<&str> =
            keywords.flatten().iter().map(|k| k.name.as_str()).collect();

        assert!(matched.is_disjoint(&missing), "sets must be disjoint");
        let union: HashSet<&str> = matched.union(&missing).copied().collect();
        assert_eq!(union, inventory, "union must cover the full inventory");
    }

    /// Identical inputs always produce the identical result.
    #[test]
    fn test_keyword_scoring_is_deterministic() {
        let profile = make_profile();
        let requirements = empty_requirements();
        let keywords = make_keywords(vec![("Rust", 5), ("COBOL", 3), ("Kubernetes", 4)]);

        let a = compute_keyword_match(&profile, &requirements, &keywords);
        let b = compute_keyword_match(&profile, &requirements, &keywords);

        assert_eq!(a.score, b.score);
        assert_eq!(a.matched.len(), b.matched.len());
        assert_eq!(a.missing.len(), b.missing.len());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_inventory_scores_zero_with_explanation() {
        let result = compute_keyword_match(
            &make_profile(),
            &empty_requirements(),
            &AtsKeywords::default(),
        );
        assert_eq!(result.score, 0);
        assert!(result.recommendations[0].contains("cannot score"));
    }

    #[test]
    fn test_recommendation_bands() {
        let missing = vec![MissingKeyword {
            keyword: "Kafka".to_string(),
            weight: 3,
        }];
        assert!(build_recommendations(85, &[])[0].contains("Strong fit"));
        assert!(build_recommendations(65, &missing)[0].contains("Kafka"));
        assert!(build_recommendations(30, &missing)[0].contains("Low fit"));
    }

    #[tokio::test]
    async fn test_llm_scorer_keeps_deterministic_partition() {
        let narrative = r#"{
            "key_strengths": ["Deep Rust background"],
            "areas_for_improvement": ["No COBOL exposure"],
            "recommendations": ["Lead with the Rust work"]
        }"#;
        let backend = Arc::new(ScriptedBackend::new(vec![narrative]));
        let scorer = LlmMatchScorer::new(scripted_client(backend.clone()));

        let keywords = make_keywords(vec![("Rust", 5), ("COBOL", 3)]);
        let result = scorer
            .score(&make_profile(), &empty_requirements(), &keywords)
            .await
            .unwrap();

        // Narrative comes from the model, partition and score do not.
        assert_eq!(result.scorer_backend, "llm");
        assert_eq!(result.key_strengths, vec!["Deep Rust background"]);
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.missing.len(), 1);
        let expected = compute_keyword_match(&make_profile(), &empty_requirements(), &keywords);
        assert_eq!(result.score, expected.score);
        assert_eq!(backend.calls(), 1);
    }
}
