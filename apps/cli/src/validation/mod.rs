//! Validation — deterministic quality/ATS heuristics over generated output.
//!
//! No model calls here. A failing verdict makes the workflow regenerate the
//! document exactly once; a second failure becomes a non-fatal quality
//! warning on the run report.

use serde::Serialize;
use tracing::debug;

use crate::analysis::ats::AtsKeywords;
use crate::generation::cover_letter::CoverLetter;
use crate::generation::resume::TailoredResume;
use crate::models::profile::CandidateProfile;

/// Thresholds for a passing verdict. Both come from `Config`.
#[derive(Debug, Clone, Copy)]
pub struct ValidationThresholds {
    pub min_score: u32,
    pub min_keyword_coverage: f32,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        ValidationThresholds {
            min_score: 70,
            min_keyword_coverage: 0.4,
        }
    }
}

/// Verdict for one generated document.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationVerdict {
    pub passed: bool,
    pub score: u32,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    /// Fraction of the ATS inventory the document text covers.
    pub keyword_coverage: f32,
}

/// Verbs that signal unquantified, low-impact bullets.
const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
];

/// Penalties per failed check.
const PENALTY_EMPTY_NAME: u32 = 50;
const PENALTY_EMPTY_SUMMARY: u32 = 40;
const PENALTY_EXPERIENCE_MISMATCH: u32 = 30;
const PENALTY_LOW_COVERAGE: u32 = 25;
const PENALTY_PER_VAGUE_BULLET: u32 = 5;
const PENALTY_VAGUE_CAP: u32 = 20;

/// Validates a tailored resume against the profile and the ATS inventory.
pub fn validate_resume(
    resume: &TailoredResume,
    profile: &CandidateProfile,
    keywords: &AtsKeywords,
    thresholds: ValidationThresholds,
) -> ValidationVerdict {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();
    let mut penalty = 0u32;

    if resume.name.trim().is_empty() {
        issues.push("resume has no candidate name".to_string());
        penalty += PENALTY_EMPTY_NAME;
    }

    if resume.summary.trim().is_empty() {
        issues.push("professional summary is empty".to_string());
        suggestions.push("Generate a 3-4 sentence first-person summary.".to_string());
        penalty += PENALTY_EMPTY_SUMMARY;
    }

    if resume.work_experience.len() != profile.professional_experience.len() {
        issues.push(format!(
            "experience count changed: profile has {}, resume has {}",
            profile.professional_experience.len(),
            resume.work_experience.len()
        ));
        suggestions.push("Restore the dropped experience entries.".to_string());
        penalty += PENALTY_EXPERIENCE_MISMATCH;
    }

    let keyword_coverage = keyword_coverage(&resume.full_text(), keywords);
    if keywords.total_count() > 0 && keyword_coverage < thresholds.min_keyword_coverage {
        issues.push(format!(
            "ATS keyword coverage {:.0}% is below the {:.0}% minimum",
            keyword_coverage * 100.0,
            thresholds.min_keyword_coverage * 100.0
        ));
        suggestions.push(
            "Work more of the job's keywords into bullets the profile supports.".to_string(),
        );
        penalty += PENALTY_LOW_COVERAGE;
    }

    let mut vague_penalty = 0u32;
    for exp in &resume.work_experience {
        for bullet in &exp.responsibilities {
            if let Some(verb) = vague_unquantified(bullet) {
                issues.push(format!(
                    "vague bullet without quantified impact: \"{}\"",
                    truncate(bullet, 60)
                ));
                suggestions.push(format!(
                    "Quantify '{verb}': how much? Add a number, percentage, or time saved."
                ));
                vague_penalty += PENALTY_PER_VAGUE_BULLET;
            }
        }
    }
    penalty += vague_penalty.min(PENALTY_VAGUE_CAP);

    let score = 100u32.saturating_sub(penalty);
    let passed = score >= thresholds.min_score;

    debug!(
        "Resume validation: score={}, coverage={:.2}, issues={}",
        score,
        keyword_coverage,
        issues.len()
    );

    ValidationVerdict {
        passed,
        score,
        issues,
        suggestions,
        keyword_coverage,
    }
}

/// Validates a cover letter: structural completeness plus keyword usage.
pub fn validate_cover_letter(
    letter: &CoverLetter,
    thresholds: ValidationThresholds,
) -> ValidationVerdict {
    let mut issues = letter.structural_issues();
    let mut suggestions = Vec::new();
    let mut penalty = issues.len() as u32 * 20;

    if letter.keywords_used.is_empty() {
        issues.push("no ATS keywords were used".to_string());
        suggestions.push("Weave the job's strongest keywords into the body.".to_string());
        penalty += 10;
    }

    let score = 100u32.saturating_sub(penalty);
    let passed = score >= thresholds.min_score;

    ValidationVerdict {
        passed,
        score,
        issues,
        suggestions,
        keyword_coverage: 0.0,
    }
}

/// Fraction of distinct ATS keywords appearing in the document text.
fn keyword_coverage(document_text: &str, keywords: &AtsKeywords) -> f32 {
    let inventory = keywords.flatten();
    if inventory.is_empty() {
        return 1.0;
    }
    let hits = inventory
        .iter()
        .filter(|k| document_text.contains(&k.name.to_lowercase()))
        .count();
    hits as f32 / inventory.len() as f32
}

/// Returns the vague verb when a bullet uses one without quantified impact.
///
/// A bullet counts as quantified when it carries a digit, a percent or
/// currency sign, or a `~N` estimate.
fn vague_unquantified(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();

    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = text.contains('$') || text.contains('€') || text.contains('£');
    let has_estimate = text.contains('~') && has_digit;

    if has_digit || has_percent || has_currency || has_estimate {
        return None;
    }

    VAGUE_VERBS.iter().find(|&&v| lower.contains(v)).copied()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}
