mod analysis;
mod config;
mod errors;
mod generation;
mod intake;
mod llm_client;
mod matching;
mod models;
mod render;
mod validation;
mod workflow;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::Config;
use crate::errors::PipelineError;
use crate::llm_client::{AnthropicBackend, ModelClient, RetryPolicy};
use crate::matching::scorer::{KeywordMatchScorer, LlmMatchScorer, MatchScorer};
use crate::workflow::{RunReport, WorkflowManager, WorkflowState};

/// AI-powered resume generator that tailors resumes to job descriptions.
#[derive(Debug, Parser)]
#[command(name = "tailor", version, about)]
struct Cli {
    /// Directory containing about_me.yaml and about_job.yaml
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for generated documents
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Directory for the append-only diagnostic log
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Keep existing files in the output directory instead of clearing it
    #[arg(long)]
    keep_output: bool,

    /// Use the LLM match scorer for narrative strengths and gaps
    /// (the keyword partition stays deterministic either way)
    #[arg(long)]
    llm_matcher: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&cli.log_dir, &config) {
        eprintln!("Failed to initialize logging: {e:#}");
        std::process::exit(1);
    }

    info!("Starting tailor v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli, config).await {
        Ok(report) => print_summary(&report),
        Err(e) => {
            error!("Workflow state: {}: {e}", WorkflowState::Failed);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli, config: Config) -> Result<RunReport, PipelineError> {
    let retry = RetryPolicy {
        max_attempts: config.max_model_retries,
        delay: config.retry_delay,
    };

    let backend = AnthropicBackend::new(
        config.anthropic_api_key.clone(),
        config.model.clone(),
        config.request_timeout,
        retry,
    )?;
    let client = ModelClient::new(Arc::new(backend), retry);
    info!("LLM client initialized (model: {})", client.model_id());

    let scorer: Arc<dyn MatchScorer> = if cli.llm_matcher {
        Arc::new(LlmMatchScorer::new(client.clone()))
    } else {
        Arc::new(KeywordMatchScorer)
    };

    let manager = WorkflowManager::new(client, scorer, config);
    manager
        .run(&cli.data_dir, &cli.output_dir, cli.keep_output)
        .await
}

/// Console layer filtered by RUST_LOG/config; file layer is append-only at
/// debug level with ANSI disabled.
fn init_logging(log_dir: &Path, config: &Config) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("pipeline.log"))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .with_filter(LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("\nResume generation complete.");
    println!("  Match score:       {}/100 ({})", report.match_score, report.scorer_backend);
    println!(
        "  Keyword coverage:  {:.0}%",
        report.keyword_coverage * 100.0
    );

    if !report.warnings.is_empty() {
        println!("\nQuality warnings:");
        for warning in &report.warnings {
            println!("  - {warning}");
        }
    }

    println!("\nGenerated files:");
    for doc in &report.documents {
        println!("  {}: {}", doc.kind, doc.path.display());
    }
    println!("  analysis: {}", report.analysis_path.display());
}
