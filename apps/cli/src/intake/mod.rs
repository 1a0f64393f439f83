//! Intake — loads and validates the two input documents.
//!
//! Validation runs here, before any model call. A document that fails these
//! checks aborts the run with `InputFormat`; the model never sees it.

use std::path::Path;

use tracing::{debug, info};

use crate::errors::PipelineError;
use crate::models::job::{JobDocument, JobPosting};
use crate::models::profile::CandidateProfile;

/// Loads and validates the candidate profile from `about_me.yaml`.
pub fn load_profile(path: &Path) -> Result<CandidateProfile, PipelineError> {
    info!("Loading profile: {}", path.display());
    let raw = read_input(path)?;

    let profile: CandidateProfile = serde_yaml::from_str(&raw)
        .map_err(|e| PipelineError::input_format(path.display().to_string(), e.to_string()))?;

    let issues = profile_issues(&profile);
    if !issues.is_empty() {
        return Err(PipelineError::input_format(
            path.display().to_string(),
            issues.join("; "),
        ));
    }

    debug!(
        "Profile loaded: {} experience entries, {} technical skills",
        profile.professional_experience.len(),
        profile.skills.technical.len()
    );
    Ok(profile)
}

/// Loads and validates the job posting from `about_job.yaml`.
pub fn load_job(path: &Path) -> Result<JobPosting, PipelineError> {
    info!("Loading job posting: {}", path.display());
    let raw = read_input(path)?;

    let doc: JobDocument = serde_yaml::from_str(&raw)
        .map_err(|e| PipelineError::input_format(path.display().to_string(), e.to_string()))?;

    let issues = job_issues(&doc);
    if !issues.is_empty() {
        return Err(PipelineError::input_format(
            path.display().to_string(),
            issues.join("; "),
        ));
    }

    let posting = JobPosting::from_document(doc, raw);
    debug!(
        "Job posting loaded: {} at {} ({} bytes raw)",
        posting.title,
        posting.company,
        posting.raw_text.len()
    );
    Ok(posting)
}

fn read_input(path: &Path) -> Result<String, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::input_format(
            path.display().to_string(),
            "file not found",
        ));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Structural checks on a parsed profile. Returns human-readable issues.
fn profile_issues(profile: &CandidateProfile) -> Vec<String> {
    let mut issues = Vec::new();

    if profile.personal_information.name.trim().is_empty() {
        issues.push("personal_information.name is empty".to_string());
    }
    if profile.professional_experience.is_empty() {
        issues.push("professional_experience has no entries".to_string());
    }
    for (i, exp) in profile.professional_experience.iter().enumerate() {
        if exp.company.trim().is_empty() {
            issues.push(format!("professional_experience[{i}].company is empty"));
        }
        if exp.position.trim().is_empty() {
            issues.push(format!("professional_experience[{i}].position is empty"));
        }
    }

    issues
}

/// Structural checks on a parsed job document.
fn job_issues(doc: &JobDocument) -> Vec<String> {
    let mut issues = Vec::new();

    if doc.job_listing.company.trim().is_empty() {
        issues.push("job_listing.company is empty".to_string());
    }
    if doc.job_listing.details.title.trim().is_empty() {
        issues.push("job_listing.details.title is empty".to_string());
    }
    if doc.job_listing.details.description.trim().is_empty() {
        issues.push("job_listing.details.description is empty".to_string());
    }

    issues
}
