#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! One grading run: load inputs, build the prompt, call the provider once,
//! append the result.

use std::path::{Path, PathBuf};

use bon::Builder;

use crate::{
    error::GradeError,
    input::{SubmissionSource, load_assignment, load_submission},
    output::{RunRecord, append_record},
    prompt::build_prompt,
    provider::Provider,
    report::{GradingReport, write_report},
};

/// Default assignment brief location.
pub const DEFAULT_ASSIGNMENT: &str = "assignment.txt";

/// Default results file.
pub const DEFAULT_OUTPUT: &str = "grading_results.txt";

/// Where a run reads from and writes to.
#[derive(Debug, Clone, Builder)]
#[builder(on(PathBuf, into))]
pub struct RunConfig {
    /// Assignment requirements file.
    #[builder(default = PathBuf::from(DEFAULT_ASSIGNMENT))]
    assignment: PathBuf,
    /// Student submission.
    submission: SubmissionSource,
    /// Results file that blocks are appended to.
    #[builder(default = PathBuf::from(DEFAULT_OUTPUT))]
    output:     PathBuf,
    /// Optional detailed report destination.
    report:     Option<PathBuf>,
}

impl RunConfig {
    /// Assignment requirements file.
    pub fn assignment(&self) -> &Path {
        &self.assignment
    }

    /// Student submission.
    pub fn submission(&self) -> &SubmissionSource {
        &self.submission
    }

    /// Results file.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Detailed report destination, if requested.
    pub fn report(&self) -> Option<&Path> {
        self.report.as_deref()
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The record appended to the results file.
    pub record:           RunRecord,
    /// Rubric fields found in the reply.
    pub report:           GradingReport,
    /// Size of the graded requirements, in characters.
    pub assignment_chars: usize,
    /// Size of the graded code, in characters.
    pub solution_chars:   usize,
}

/// Runs the whole pipeline with `provider`.
///
/// Both inputs are loaded and validated before the provider is called, so a
/// missing or empty input never costs a remote request.
pub async fn run<P: Provider>(config: &RunConfig, provider: &P) -> Result<RunSummary, GradeError> {
    tracing::info!("Reading assignment requirements...");
    let assignment = load_assignment(config.assignment())?;

    tracing::info!("Reading student solution...");
    let code = load_submission(config.submission())?;

    let prompt = build_prompt(&assignment, &code);
    let assignment_chars = assignment.as_str().chars().count();
    let solution_chars = code.as_str().chars().count();
    tracing::info!(
        provider = %provider.kind(),
        model = provider.model(),
        assignment_chars,
        solution_chars,
        prompt_chars = prompt.len(),
        "Sending to AI for grading..."
    );

    let response = provider.generate(prompt.as_str()).await?;
    let record = RunRecord::new(provider.kind(), provider.model(), response);

    append_record(config.output(), &record)?;

    let report = GradingReport::parse(record.response());
    match report.score_value() {
        Some(score) => tracing::info!(
            score,
            grade = report.grade.as_deref().unwrap_or("N/A"),
            "Parsed rubric summary"
        ),
        None => tracing::warn!("Response did not follow the requested format; saved it verbatim"),
    }

    if let Some(path) = config.report() {
        let rendered = report.render(record.generated_at(), &assignment, &code);
        write_report(path, &rendered)?;
    }

    Ok(RunSummary {
        record,
        report,
        assignment_chars,
        solution_chars,
    })
}
