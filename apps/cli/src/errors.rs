use thiserror::Error;

use crate::llm_client::LlmError;

/// Pipeline-level error type.
///
/// `InputFormat` and exhausted-retry `Model` errors are fatal and abort the
/// run with a user-visible message. Validation concerns are NOT errors — they
/// travel on the run report as warnings and never block persistence.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input format error in {path}: {message}")]
    InputFormat { path: String, message: String },

    #[error("Model error: {0}")]
    Model(#[from] LlmError),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Constructs an `InputFormat` error for the given source file.
    pub fn input_format(path: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::InputFormat {
            path: path.into(),
            message: message.into(),
        }
    }
}
