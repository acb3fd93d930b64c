//! # aigrade
//!
//! Grades a programming assignment submission against its brief. The brief
//! and the student's code (a notebook's code cells or a plain script) are
//! rendered into a rubric prompt, sent to OpenAI or Gemini, and the model's
//! reply is appended to a timestamped results file.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Provider selection, credentials and request tuning
pub mod config;
/// Failure taxonomy for a grading run
pub mod error;
/// Loading the assignment brief and the submission
pub mod input;
/// Appending results to the output file
pub mod output;
/// One end-to-end grading run
pub mod pipeline;
/// The rubric prompt
pub mod prompt;
/// Remote text-generation providers
pub mod provider;
/// Best-effort reading of the rubric reply
pub mod report;

pub use config::{Credentials, ProviderKind, ProviderSettings};
pub use error::GradeError;
pub use input::{AssignmentSpec, SubmissionCode, SubmissionSource};
pub use pipeline::{RunConfig, RunSummary, run};
pub use provider::{Grader, Provider};
