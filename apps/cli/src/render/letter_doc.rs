//! Cover letter document — formats a `CoverLetter` as a Word file.

use std::path::{Path, PathBuf};

use chrono::Local;
use docx_rs::{AlignmentType, Docx, Paragraph, Run};
use tracing::info;

use crate::errors::PipelineError;
use crate::generation::cover_letter::CoverLetter;
use crate::render::{docx_error, sanitize_filename_component};

/// Writes `cover_letter_<company>_<timestamp>.docx` and returns its path.
pub fn render_cover_letter(
    letter: &CoverLetter,
    company: &str,
    output_dir: &Path,
    timestamp: &str,
) -> Result<PathBuf, PipelineError> {
    let safe_company = sanitize_filename_component(company);
    let path = output_dir.join(format!("cover_letter_{safe_company}_{timestamp}.docx"));

    let date_line = Local::now().format("%B %d, %Y").to_string();

    let mut docx = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Right)
                .add_run(Run::new().add_text(date_line.as_str())),
        )
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(letter.greeting.as_str()).bold()),
        )
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(letter.opening_paragraph.as_str())),
        );

    for paragraph in &letter.body_paragraphs {
        docx = docx
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(paragraph.as_str())));
    }

    docx = docx.add_paragraph(
        Paragraph::new().add_run(Run::new().add_text(letter.closing_paragraph.as_str())),
    );

    for line in letter.signature.split('\n') {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let file = std::fs::File::create(&path)?;
    docx.build().pack(file).map_err(docx_error)?;

    info!("Cover letter document written: {}", path.display());
    Ok(path)
}
