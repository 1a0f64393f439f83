//! Resume document — formats a `TailoredResume` as a Word file.
//!
//! Layout: centered name and contact line, Professional Summary,
//! Professional Experience with recency-capped bullets, prioritized Skills.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use docx_rs::{AlignmentType, Docx, Paragraph, Run};
use tracing::info;

use crate::analysis::job_analyzer::JobRequirements;
use crate::errors::PipelineError;
use crate::generation::resume::TailoredResume;
use crate::models::profile::CandidateProfile;
use crate::render::docx_error;

/// Per-category skill caps on the rendered resume.
const MAX_TECHNICAL_SKILLS: usize = 8;
const MAX_SOFT_SKILLS: usize = 5;
const MAX_OTHER_SKILLS: usize = 5;

/// Bullet caps by experience index: most recent roles get the most lines.
const BULLET_CAPS: &[usize] = &[5, 4, 3, 2];
const BULLET_CAP_TAIL: usize = 1;

fn bullet_cap(index: usize) -> usize {
    BULLET_CAPS.get(index).copied().unwrap_or(BULLET_CAP_TAIL)
}

/// Writes `resume_<timestamp>.docx` and returns its path.
pub fn render_resume(
    resume: &TailoredResume,
    profile: &CandidateProfile,
    requirements: &JobRequirements,
    output_dir: &Path,
    timestamp: &str,
) -> Result<PathBuf, PipelineError> {
    let path = output_dir.join(format!("resume_{timestamp}.docx"));

    let mut docx = Docx::new();

    // Name, centered.
    docx = docx.add_paragraph(
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(Run::new().add_text(resume.name.as_str()).bold().size(32)),
    );

    // Contact line: email | phone | online presence.
    let contact_line = build_contact_line(profile);
    if !contact_line.is_empty() {
        docx = docx.add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(contact_line.as_str())),
        );
    }

    if !resume.summary.is_empty() {
        docx = docx
            .add_paragraph(heading("Professional Summary"))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(resume.summary.as_str())));
    }

    if !resume.work_experience.is_empty() {
        docx = docx.add_paragraph(heading("Professional Experience"));

        for (idx, exp) in resume.work_experience.iter().enumerate() {
            let title = format!("{} - {}", exp.position, exp.company);
            docx = docx.add_paragraph(
                Paragraph::new().add_run(Run::new().add_text(title.as_str()).bold()),
            );

            let mut period_loc = Vec::new();
            if !exp.employment_period.is_empty() {
                period_loc.push(exp.employment_period.as_str());
            }
            if !exp.location.is_empty() {
                period_loc.push(exp.location.as_str());
            }
            if !period_loc.is_empty() {
                docx = docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(period_loc.join(" | ").as_str()).italic()),
                );
            }

            for bullet in exp.responsibilities.iter().take(bullet_cap(idx)) {
                docx = docx.add_paragraph(
                    Paragraph::new().add_run(Run::new().add_text(format!("• {bullet}").as_str())),
                );
            }
        }
    }

    let skills = prioritized_skills(resume, requirements);
    if !skills.is_empty() {
        docx = docx.add_paragraph(heading("Skills"));
        for (category, list) in skills {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(format!("{category}: ").as_str()).bold())
                    .add_run(Run::new().add_text(list.join(", ").as_str())),
            );
        }
    }

    let file = std::fs::File::create(&path)?;
    docx.build().pack(file).map_err(docx_error)?;

    info!("Resume document written: {}", path.display());
    Ok(path)
}

fn heading(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(26))
}

fn build_contact_line(profile: &CandidateProfile) -> String {
    let info = &profile.personal_information;
    let mut parts: Vec<String> = Vec::new();

    if let Some(email) = info.contact.get("email") {
        parts.push(email.clone());
    }
    if let Some(phone) = info.contact.get("phone") {
        match info.contact.get("phone_prefix") {
            Some(prefix) => parts.push(format!("{prefix}{phone}")),
            None => parts.push(phone.clone()),
        }
    }
    for url in info.online_presence.values() {
        parts.push(url.clone());
    }

    parts.join(" | ")
}

/// Orders each skill category by relevance to the job and applies the
/// per-category caps. Categories render in a fixed order.
pub fn prioritized_skills(
    resume: &TailoredResume,
    requirements: &JobRequirements,
) -> Vec<(&'static str, Vec<String>)> {
    let required: HashSet<String> = requirements
        .all_requirement_terms()
        .into_iter()
        .collect();
    let key_terms = extract_key_terms(requirements);

    let mut out = Vec::new();
    for (category, list, cap) in [
        ("Technical", &resume.skills.technical, MAX_TECHNICAL_SKILLS),
        ("Professional", &resume.skills.soft, MAX_SOFT_SKILLS),
        ("Management", &resume.skills.other, MAX_OTHER_SKILLS),
    ] {
        if list.is_empty() {
            continue;
        }
        let mut ranked: Vec<(u32, &String)> = list
            .iter()
            .map(|skill| (relevance_score(skill, &required, &key_terms), skill))
            .collect();
        // Stable sort: ties keep the profile's original order.
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        out.push((
            category,
            ranked
                .into_iter()
                .take(cap)
                .map(|(_, s)| s.clone())
                .collect(),
        ));
    }
    out
}

/// 100 for a direct requirement match, 50 for a partial (substring either
/// direction), 25 when the skill contains a key term from the posting.
fn relevance_score(skill: &str, required: &HashSet<String>, key_terms: &HashSet<String>) -> u32 {
    let skill_lower = skill.to_lowercase();

    if required.contains(&skill_lower) {
        100
    } else if required
        .iter()
        .any(|req| req.contains(&skill_lower) || skill_lower.contains(req.as_str()))
    {
        50
    } else if key_terms.iter().any(|term| skill_lower.contains(term)) {
        25
    } else {
        0
    }
}

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "will", "able", "must", "can", "may", "should", "would", "could",
    "have", "has", "had", "been", "was", "were", "are", "our", "your", "their", "years", "year",
    "experience",
];

/// Meaningful words from responsibilities and qualifications.
fn extract_key_terms(requirements: &JobRequirements) -> HashSet<String> {
    let mut terms = HashSet::new();

    let phrases = requirements
        .key_responsibilities
        .values()
        .flatten()
        .chain(requirements.required_qualifications.values().flatten());

    for phrase in phrases {
        for word in phrase.split_whitespace() {
            let cleaned: String = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if cleaned.len() > 2
                && !STOPWORDS.contains(&cleaned.as_str())
                && !cleaned.chars().all(|c| c.is_ascii_digit())
            {
                terms.insert(cleaned);
            }
        }
    }

    terms
}
