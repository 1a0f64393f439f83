//! Workflow Manager — sequences the pipeline as a linear state machine.
//!
//! Loaded → Analyzed → Matched → Generated → Validated → Persisted.
//! Every transition is sequential and blocking. Validation may loop back to
//! generation exactly once per document; a second failure becomes a quality
//! warning on the report instead of an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::ats::{extract_keywords, AtsKeywords};
use crate::analysis::job_analyzer::{analyze_job, JobRequirements};
use crate::config::Config;
use crate::errors::PipelineError;
use crate::generation::cover_letter::{generate_cover_letter, CoverLetter};
use crate::generation::resume::{generate_resume, TailoredResume};
use crate::intake;
use crate::llm_client::ModelClient;
use crate::matching::scorer::MatchScorer;
use crate::matching::MatchResult;
use crate::models::document::{DocumentKind, GeneratedDocument};
use crate::models::job::JobPosting;
use crate::models::profile::CandidateProfile;
use crate::render::letter_doc::render_cover_letter;
use crate::render::resume_doc::render_resume;
use crate::validation::{
    validate_cover_letter, validate_resume, ValidationThresholds, ValidationVerdict,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Loaded,
    Analyzed,
    Matched,
    Generated,
    Validated,
    Persisted,
    Failed,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowState::Loaded => "loaded",
            WorkflowState::Analyzed => "analyzed",
            WorkflowState::Matched => "matched",
            WorkflowState::Generated => "generated",
            WorkflowState::Validated => "validated",
            WorkflowState::Persisted => "persisted",
            WorkflowState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Final run summary handed back to the CLI.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub state: WorkflowState,
    pub match_score: u32,
    pub scorer_backend: String,
    pub keyword_coverage: f32,
    pub documents: Vec<GeneratedDocument>,
    pub analysis_path: PathBuf,
    pub warnings: Vec<String>,
}

/// Everything persisted to `analysis_result_<timestamp>.yaml`.
#[derive(Serialize)]
struct AnalysisDump<'a> {
    resume: &'a TailoredResume,
    cover_letter: &'a CoverLetter,
    match_result: &'a MatchResult,
}

pub struct WorkflowManager {
    client: ModelClient,
    scorer: Arc<dyn MatchScorer>,
    config: Config,
}

impl WorkflowManager {
    pub fn new(client: ModelClient, scorer: Arc<dyn MatchScorer>, config: Config) -> Self {
        info!("Workflow manager initialized (model: {})", client.model_id());
        Self {
            client,
            scorer,
            config,
        }
    }

    /// Runs the full pipeline. Fatal errors abort; validation concerns end up
    /// in `RunReport::warnings`.
    pub async fn run(
        &self,
        data_dir: &Path,
        output_dir: &Path,
        keep_output: bool,
    ) -> Result<RunReport, PipelineError> {
        // ── Loaded ──────────────────────────────────────────────────────
        let profile = intake::load_profile(&data_dir.join("about_me.yaml"))?;
        let job = intake::load_job(&data_dir.join("about_job.yaml"))?;
        self.transition(WorkflowState::Loaded);

        prepare_output_dir(output_dir, keep_output)?;

        // ── Analyzed ────────────────────────────────────────────────────
        let requirements = analyze_job(&job, &self.client).await?;
        let keywords = extract_keywords(&job, &self.client).await?;
        self.transition(WorkflowState::Analyzed);

        // ── Matched ─────────────────────────────────────────────────────
        let match_result = self
            .scorer
            .score(&profile, &requirements, &keywords)
            .await?;
        self.transition(WorkflowState::Matched);

        // ── Generated ───────────────────────────────────────────────────
        let mut resume =
            generate_resume(&profile, &requirements, &match_result, &keywords, &self.client)
                .await?;
        let mut letter =
            generate_cover_letter(&profile, &requirements, &match_result, &job, &self.client)
                .await?;
        self.transition(WorkflowState::Generated);

        // ── Validated ───────────────────────────────────────────────────
        let thresholds = ValidationThresholds {
            min_score: self.config.min_validation_score,
            min_keyword_coverage: self.config.min_keyword_coverage,
        };
        let mut warnings = Vec::new();

        let resume_verdict = self
            .validate_resume_with_regeneration(
                &mut resume,
                &profile,
                &requirements,
                &match_result,
                &keywords,
                thresholds,
                &mut warnings,
            )
            .await?;

        self.validate_letter_with_regeneration(
            &mut letter,
            &profile,
            &requirements,
            &match_result,
            &job,
            thresholds,
            &mut warnings,
        )
        .await?;
        self.transition(WorkflowState::Validated);

        // ── Persisted ───────────────────────────────────────────────────
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

        let resume_path =
            render_resume(&resume, &profile, &requirements, output_dir, &timestamp)?;
        let letter_path =
            render_cover_letter(&letter, &job.company, output_dir, &timestamp)?;
        let analysis_path =
            save_analysis(&resume, &letter, &match_result, output_dir, &timestamp)?;
        self.transition(WorkflowState::Persisted);

        Ok(RunReport {
            state: WorkflowState::Persisted,
            match_score: match_result.score,
            scorer_backend: match_result.scorer_backend.clone(),
            keyword_coverage: resume_verdict.keyword_coverage,
            documents: vec![
                GeneratedDocument::new(DocumentKind::Resume, resume_path, self.client.model_id()),
                GeneratedDocument::new(
                    DocumentKind::CoverLetter,
                    letter_path,
                    self.client.model_id(),
                ),
            ],
            analysis_path,
            warnings,
        })
    }

    /// Validates the resume, regenerating exactly once on failure.
    #[allow(clippy::too_many_arguments)]
    async fn validate_resume_with_regeneration(
        &self,
        resume: &mut TailoredResume,
        profile: &CandidateProfile,
        requirements: &JobRequirements,
        match_result: &MatchResult,
        keywords: &AtsKeywords,
        thresholds: ValidationThresholds,
        warnings: &mut Vec<String>,
    ) -> Result<ValidationVerdict, PipelineError> {
        let mut verdict = validate_resume(resume, profile, keywords, thresholds);
        if verdict.passed {
            return Ok(verdict);
        }

        warn!(
            "Resume failed validation (score {}): {} — regenerating once",
            verdict.score,
            verdict.issues.join("; ")
        );
        *resume =
            generate_resume(profile, requirements, match_result, keywords, &self.client).await?;

        verdict = validate_resume(resume, profile, keywords, thresholds);
        if !verdict.passed {
            warnings.push(format!(
                "resume quality warning after regeneration (score {}): {}",
                verdict.score,
                verdict.issues.join("; ")
            ));
        }
        Ok(verdict)
    }

    /// Validates the cover letter, regenerating exactly once on failure.
    #[allow(clippy::too_many_arguments)]
    async fn validate_letter_with_regeneration(
        &self,
        letter: &mut CoverLetter,
        profile: &CandidateProfile,
        requirements: &JobRequirements,
        match_result: &MatchResult,
        job: &JobPosting,
        thresholds: ValidationThresholds,
        warnings: &mut Vec<String>,
    ) -> Result<(), PipelineError> {
        let mut verdict = validate_cover_letter(letter, thresholds);
        if verdict.passed {
            return Ok(());
        }

        warn!(
            "Cover letter failed validation (score {}): {} — regenerating once",
            verdict.score,
            verdict.issues.join("; ")
        );
        *letter =
            generate_cover_letter(profile, requirements, match_result, job, &self.client).await?;

        verdict = validate_cover_letter(letter, thresholds);
        if !verdict.passed {
            warnings.push(format!(
                "cover letter quality warning after regeneration (score {}): {}",
                verdict.score,
                verdict.issues.join("; ")
            ));
        }
        Ok(())
    }

    fn transition(&self, state: WorkflowState) {
        info!("Workflow state: {state}");
    }
}

/// Clears (unless `keep_output`) and recreates the output directory.
fn prepare_output_dir(output_dir: &Path, keep_output: bool) -> Result<(), PipelineError> {
    if !keep_output && output_dir.exists() {
        info!("Clearing output directory: {}", output_dir.display());
        std::fs::remove_dir_all(output_dir)?;
    }
    std::fs::create_dir_all(output_dir)?;
    Ok(())
}

/// Persists the combined analysis as YAML next to the documents.
fn save_analysis(
    resume: &TailoredResume,
    letter: &CoverLetter,
    match_result: &MatchResult,
    output_dir: &Path,
    timestamp: &str,
) -> Result<PathBuf, PipelineError> {
    let path = output_dir.join(format!("analysis_result_{timestamp}.yaml"));
    let dump = AnalysisDump {
        resume,
        cover_letter: letter,
        match_result,
    };
    let yaml = serde_yaml::to_string(&dump)
        .map_err(|e| PipelineError::Generation(format!("failed to serialize analysis: {e}")))?;
    std::fs::write(&path, yaml)?;
    info!("Analysis saved: {}", path.display());
    Ok(path)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests — full pipeline against the scripted backend
// ────────────────────────────────────────────────────────────────────────────
