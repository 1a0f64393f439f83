//! Generated-document metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Resume => write!(f, "resume"),
            DocumentKind::CoverLetter => write!(f, "cover letter"),
        }
    }
}

/// A rendered output document plus its generation metadata. Produced once per
/// run, validated, then persisted; never re-read by the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub path: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub model: String,
}

impl GeneratedDocument {
    pub fn new(kind: DocumentKind, path: PathBuf, model: &str) -> Self {
        GeneratedDocument {
            id: Uuid::new_v4(),
            kind,
            path,
            generated_at: Utc::now(),
            model: model.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_metadata_records_kind_and_model() {
        let doc = GeneratedDocument::new(
            DocumentKind::Resume,
            PathBuf::from("output/resume.docx"),
            "claude-sonnet-4-5",
        );
        assert_eq!(doc.kind, DocumentKind::Resume);
        assert_eq!(doc.model, "claude-sonnet-4-5");
        assert!(doc.path.ends_with("resume.docx"));
    }

    #[test]
    fn test_document_kind_display() {
        assert_eq!(DocumentKind::CoverLetter.to_string(), "cover letter");
    }
}
