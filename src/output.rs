#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Appending grading results to the results file.

use std::{fs::OpenOptions, io::Write, path::Path};

use chrono::{DateTime, Local};

use crate::{config::ProviderKind, error::GradeError};

/// Title line that opens every appended block.
pub const BLOCK_TITLE: &str = "ASSIGNMENT GRADING RESULTS";

/// Format used for the human-readable timestamp line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One grading outcome, ready to be appended.
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// When the response was received.
    generated_at: DateTime<Local>,
    /// Provider that produced the response.
    provider:     ProviderKind,
    /// Model that produced the response.
    model:        String,
    /// Verbatim provider response.
    response:     String,
}

impl RunRecord {
    /// Stamps `response` with the current local time.
    pub fn new(
        provider: ProviderKind,
        model: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self::at(Local::now(), provider, model, response)
    }

    /// Creates a record with an explicit timestamp.
    pub fn at(
        generated_at: DateTime<Local>,
        provider: ProviderKind,
        model: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            generated_at,
            provider,
            model: model.into(),
            response: response.into(),
        }
    }

    /// When the response was received.
    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`].
    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Provider that produced the response.
    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Model that produced the response.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Verbatim provider response.
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Renders the block written to the results file.
    pub fn render(&self) -> String {
        format!(
            "{BLOCK_TITLE}\nGenerated on: {}\nProvider: {} ({})\n{}\n\n{}\n\n",
            self.timestamp(),
            self.provider,
            self.model,
            "=".repeat(50),
            self.response
        )
    }
}

/// Appends `record` to `path`, creating the file if needed. Earlier blocks
/// are never read or modified.
pub fn append_record(path: &Path, record: &RunRecord) -> Result<(), GradeError> {
    let write_err = |source| GradeError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;

    file.write_all(record.render().as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    tracing::info!("Results saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn block_has_timestamp_before_response() {
        let at = Local
            .with_ymd_and_hms(2026, 3, 4, 9, 5, 7)
            .single()
            .expect("unambiguous local time");
        let record = RunRecord::at(at, ProviderKind::Gemini, "gemini-1.5-flash", "Score: 90/100");
        let block = record.render();

        assert!(block.starts_with(BLOCK_TITLE));
        assert!(block.contains("Generated on: 2026-03-04 09:05:07\n"));
        assert!(block.contains("Provider: gemini (gemini-1.5-flash)\n"));
        let ts = block.find("Generated on:").expect("timestamp line");
        let body = block.find("Score: 90/100").expect("response");
        assert!(ts < body);
        assert!(block.ends_with("\n\nScore: 90/100\n\n"));
    }

    #[test]
    fn response_whitespace_is_written_verbatim() {
        let at = Local
            .with_ymd_and_hms(2026, 3, 4, 9, 5, 7)
            .single()
            .expect("unambiguous local time");
        let response = "  SCORE: 72\nGRADE: C\n\n```python\nx = 1  \n```\n  \n";
        let record = RunRecord::at(at, ProviderKind::OpenAi, "gpt-4o-mini", response);
        let block = record.render();

        assert!(block.ends_with(&format!("{}\n\n{response}\n\n", "=".repeat(50))));
    }
}
