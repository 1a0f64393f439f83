//! Document rendering — writes the generated content as `.docx` files.

pub mod letter_doc;
pub mod resume_doc;

use crate::errors::PipelineError;

/// Strips characters that do not belong in a filename component.
pub fn sanitize_filename_component(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect::<String>()
        .trim()
        .to_string()
}

pub(crate) fn docx_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Generation(format!("failed to write document: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_word_characters() {
        assert_eq!(sanitize_filename_component("Initech Inc"), "Initech Inc");
        assert_eq!(sanitize_filename_component("Acme-2_Labs"), "Acme-2_Labs");
    }

    #[test]
    fn test_sanitize_strips_path_and_punctuation() {
        assert_eq!(
            sanitize_filename_component("Evil/Corp: \"东京\" #1!"),
            "EvilCorp 东京 1"
        );
    }
}
