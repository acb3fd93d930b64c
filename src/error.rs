#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Failure taxonomy for a grading run.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::config::ProviderKind;

/// Exit code for command lines that cannot be acted on, whether bpaf rejected
/// them or they named an impossible combination of flags.
pub const USAGE_EXIT_CODE: u8 = 2;

/// Every way a grading run can fail. All of them are terminal for the run.
#[derive(Debug, Error)]
pub enum GradeError {
    /// The command line was well formed but asked for something impossible.
    #[error("{0}")]
    Usage(String),

    /// An input file does not exist.
    #[error("could not find `{}`", .path.display())]
    InputNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// An input file exists but could not be read.
    #[error("could not read `{}`", .path.display())]
    InputRead {
        /// Path that was read.
        path:   PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A notebook did not have the expected structure.
    #[error("`{}` is not a valid notebook", .path.display())]
    InputParse {
        /// Path of the notebook.
        path:   PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// An input was read successfully but contains nothing to grade.
    #[error("{what} in `{}` is empty", .path.display())]
    EmptyInput {
        /// Human readable name of the input.
        what: &'static str,
        /// Path the input came from.
        path: PathBuf,
    },

    /// The selected provider has no credential configured.
    #[error("{var} is not set (in .env or environment)")]
    MissingCredential {
        /// Provider that needed the credential.
        provider: ProviderKind,
        /// Environment variable that was checked.
        var:      &'static str,
    },

    /// The remote call failed or returned something unusable.
    #[error("{provider} provider error: {message}")]
    Provider {
        /// Provider that was called.
        provider: ProviderKind,
        /// What went wrong.
        message:  String,
    },

    /// The result could not be written.
    #[error("could not write results to `{}`", .path.display())]
    OutputWrite {
        /// Destination path.
        path:   PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl GradeError {
    /// Builds a provider error from anything displayable.
    pub fn provider(provider: ProviderKind, message: impl ToString) -> Self {
        Self::Provider {
            provider,
            message: message.to_string(),
        }
    }

    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => USAGE_EXIT_CODE,
            Self::InputNotFound { .. } | Self::InputRead { .. } => 3,
            Self::InputParse { .. } | Self::EmptyInput { .. } => 4,
            Self::MissingCredential { .. } => 5,
            Self::Provider { .. } => 6,
            Self::OutputWrite { .. } => 7,
        }
    }
}
