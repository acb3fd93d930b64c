#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Best-effort reading of the labelled rubric response, and the detailed
//! report rendered from it.
//!
//! The provider's reply is free text. Nothing here rejects a reply that does
//! not follow the requested format; fields that cannot be found stay empty
//! and render as `N/A`.

use std::path::Path;

use chrono::{DateTime, Local};

use crate::{
    error::GradeError,
    input::{AssignmentSpec, SubmissionCode},
    output::TIMESTAMP_FORMAT,
};

/// Labelled sections requested by the grading prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    /// `SCORE:`
    Score,
    /// `GRADE:`
    Grade,
    /// `CORRECTNESS:`
    Correctness,
    /// `CODE_QUALITY:`
    CodeQuality,
    /// `COMPLETENESS:`
    Completeness,
    /// `EFFICIENCY:`
    Efficiency,
    /// `FEEDBACK:`
    Feedback,
    /// `SUGGESTIONS:`
    Suggestions,
    /// `STRENGTHS:`
    Strengths,
    /// `WEAKNESSES:`
    Weaknesses,
}

impl Label {
    /// Every label with its literal prefix.
    const ALL: [(Label, &'static str); 10] = [
        (Label::Score, "SCORE"),
        (Label::Grade, "GRADE"),
        (Label::Correctness, "CORRECTNESS"),
        (Label::CodeQuality, "CODE_QUALITY"),
        (Label::Completeness, "COMPLETENESS"),
        (Label::Efficiency, "EFFICIENCY"),
        (Label::Feedback, "FEEDBACK"),
        (Label::Suggestions, "SUGGESTIONS"),
        (Label::Strengths, "STRENGTHS"),
        (Label::Weaknesses, "WEAKNESSES"),
    ];

    /// Splits a line into its label and the text after the colon. Markdown
    /// emphasis and heading markers around the label are tolerated.
    fn split(line: &str) -> Option<(Label, &str)> {
        let line = line.trim().trim_start_matches(['#', '*', '-', ' ']);
        Self::ALL.iter().find_map(|(label, name)| {
            let rest = line.strip_prefix(name)?;
            let rest = rest.trim_start_matches('*').strip_prefix(':')?;
            Some((*label, rest.trim_start_matches('*').trim()))
        })
    }
}

/// Rubric fields found in a provider reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradingReport {
    /// Overall score, as written by the model.
    pub score:        Option<String>,
    /// Letter grade.
    pub grade:        Option<String>,
    /// Correctness breakdown (out of 40).
    pub correctness:  Option<String>,
    /// Code quality breakdown (out of 25).
    pub code_quality: Option<String>,
    /// Completeness breakdown (out of 20).
    pub completeness: Option<String>,
    /// Efficiency breakdown (out of 15).
    pub efficiency:   Option<String>,
    /// Detailed feedback.
    pub feedback:     Option<String>,
    /// Suggested improvements.
    pub suggestions:  Option<String>,
    /// What the student did well.
    pub strengths:    Option<String>,
    /// Areas that need improvement.
    pub weaknesses:   Option<String>,
}

impl GradingReport {
    /// Reads labelled fields out of `text`. Lines that follow a label without
    /// starting a new one are appended to it, so multi-line feedback is kept.
    /// Repeated labels keep the first occurrence.
    pub fn parse(text: &str) -> Self {
        let mut report = Self::default();
        let mut current: Option<Label> = None;

        for line in text.lines() {
            if let Some((label, value)) = Label::split(line) {
                let slot = report.slot(label);
                if slot.is_none() {
                    *slot = Some(value.to_string());
                    current = Some(label);
                } else {
                    current = None;
                }
                continue;
            }

            let Some(label) = current else { continue };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(value) = report.slot(label) {
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(line);
            }
        }

        report
    }

    /// Field storage for `label`.
    fn slot(&mut self, label: Label) -> &mut Option<String> {
        match label {
            Label::Score => &mut self.score,
            Label::Grade => &mut self.grade,
            Label::Correctness => &mut self.correctness,
            Label::CodeQuality => &mut self.code_quality,
            Label::Completeness => &mut self.completeness,
            Label::Efficiency => &mut self.efficiency,
            Label::Feedback => &mut self.feedback,
            Label::Suggestions => &mut self.suggestions,
            Label::Strengths => &mut self.strengths,
            Label::Weaknesses => &mut self.weaknesses,
        }
    }

    /// Leading integer of the score, e.g. `85` from `85/100`.
    pub fn score_value(&self) -> Option<u32> {
        let score = self.score.as_deref()?.trim();
        let digits: String = score.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    }

    /// Whether the reply followed the requested format at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Renders the detailed report, including the graded inputs.
    pub fn render(
        &self,
        generated_at: DateTime<Local>,
        assignment: &AssignmentSpec,
        code: &SubmissionCode,
    ) -> String {
        /// Field text or `N/A`.
        fn or_na(field: &Option<String>) -> &str {
            field.as_deref().unwrap_or("N/A")
        }

        let score = match &self.score {
            Some(s) if s.contains('/') => s.clone(),
            Some(s) => format!("{s}/100"),
            None => "N/A/100".to_string(),
        };

        format!(
            "ASSIGNMENT GRADING REPORT\n\
             Generated on: {}\n\
             \n\
             OVERALL SCORE: {score}\n\
             GRADE: {}\n\
             \n\
             DETAILED BREAKDOWN:\n\
             - Correctness (40%): {}\n\
             - Code Quality (25%): {}\n\
             - Completeness (20%): {}\n\
             - Efficiency (15%): {}\n\
             \n\
             FEEDBACK:\n{}\n\
             \n\
             STRENGTHS:\n{}\n\
             \n\
             WEAKNESSES:\n{}\n\
             \n\
             SUGGESTIONS:\n{}\n\
             \n\
             ASSIGNMENT REQUIREMENTS:\n{}\n\
             \n\
             STUDENT SOLUTION:\n{}\n",
            generated_at.format(TIMESTAMP_FORMAT),
            or_na(&self.grade),
            or_na(&self.correctness),
            or_na(&self.code_quality),
            or_na(&self.completeness),
            or_na(&self.efficiency),
            or_na(&self.feedback),
            or_na(&self.strengths),
            or_na(&self.weaknesses),
            or_na(&self.suggestions),
            assignment.as_str().trim_end(),
            code.as_str().trim_end(),
        )
    }
}

/// Writes (or replaces) the detailed report at `path`.
pub fn write_report(path: &Path, contents: &str) -> Result<(), GradeError> {
    std::fs::write(path, contents).map_err(|source| GradeError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Detailed report saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
SCORE: 85
GRADE: B
CORRECTNESS: 35/40 - Handles the main cases
CODE_QUALITY: 20/25 - Clear names
COMPLETENESS: 18/20 - Misses input validation
EFFICIENCY: 12/15 - Fine for small inputs
FEEDBACK: Works for the examples.
Fails on negative numbers.
SUGGESTIONS: Validate inputs.
STRENGTHS: Readable.
WEAKNESSES: No tests.";

    #[test]
    fn reads_every_labelled_field() {
        let report = GradingReport::parse(WELL_FORMED);
        assert_eq!(report.score.as_deref(), Some("85"));
        assert_eq!(report.score_value(), Some(85));
        assert_eq!(report.grade.as_deref(), Some("B"));
        assert_eq!(report.code_quality.as_deref(), Some("20/25 - Clear names"));
        assert_eq!(
            report.feedback.as_deref(),
            Some("Works for the examples.\nFails on negative numbers.")
        );
        assert_eq!(report.weaknesses.as_deref(), Some("No tests."));
    }

    #[test]
    fn tolerates_markdown_emphasis() {
        let report = GradingReport::parse("**SCORE:** 72/100\n## GRADE: C\n- **STRENGTHS**: tidy");
        assert_eq!(report.score.as_deref(), Some("72/100"));
        assert_eq!(report.score_value(), Some(72));
        assert_eq!(report.grade.as_deref(), Some("C"));
        assert_eq!(report.strengths.as_deref(), Some("tidy"));
    }

    #[test]
    fn free_text_yields_empty_report() {
        let report = GradingReport::parse("Score: 90/100, nice work overall.");
        assert!(report.is_empty());
        assert_eq!(report.score_value(), None);
    }

    #[test]
    fn render_fills_missing_fields_with_na() {
        let report = GradingReport {
            score: Some("90".into()),
            ..Default::default()
        };
        let text = report.render(
            Local::now(),
            &AssignmentSpec::new("Add two numbers."),
            &SubmissionCode::new("def add(a, b): return a + b\n"),
        );
        assert!(text.contains("OVERALL SCORE: 90/100\n"));
        assert!(text.contains("GRADE: N/A\n"));
        assert!(text.contains("ASSIGNMENT REQUIREMENTS:\nAdd two numbers.\n"));
        assert!(text.ends_with("STUDENT SOLUTION:\ndef add(a, b): return a + b\n"));
    }
}
