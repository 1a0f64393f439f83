//! Job posting — the structured `about_job.yaml` document.

use serde::{Deserialize, Serialize};

/// On-disk shape of `about_job.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDocument {
    pub job_listing: JobListing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub company: String,
    pub details: JobDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetails {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// Flattened, immutable job posting handed to the pipeline.
/// `raw_text` preserves the full document for prompt context.
#[derive(Debug, Clone)]
pub struct JobPosting {
    pub company: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub raw_text: String,
}

impl JobPosting {
    pub fn from_document(doc: JobDocument, raw_text: String) -> Self {
        JobPosting {
            company: doc.job_listing.company,
            title: doc.job_listing.details.title,
            description: doc.job_listing.details.description,
            requirements: doc.job_listing.details.requirements,
            raw_text,
        }
    }

    /// Description plus the explicit requirements list, for prompt context.
    pub fn prompt_text(&self) -> String {
        if self.requirements.is_empty() {
            self.description.clone()
        } else {
            format!(
                "{}\n\nListed requirements:\n- {}",
                self.description,
                self.requirements.join("\n- ")
            )
        }
    }
}
