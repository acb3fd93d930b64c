#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Loading the assignment brief and the student's submission.

/// Code extraction from Jupyter notebooks
pub mod notebook;

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use crate::error::GradeError;

/// Full text of the assignment requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentSpec(String);

impl AssignmentSpec {
    /// Wraps requirements text that has already been read.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the requirements text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssignmentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source code extracted from the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionCode(String);

impl SubmissionCode {
    /// Wraps source code that has already been extracted.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the source code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the student's code comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionSource {
    /// A Jupyter notebook; only code cells are graded.
    Notebook(PathBuf),
    /// A plain script, graded verbatim.
    Script(PathBuf),
}

impl SubmissionSource {
    /// Resolves the `--notebook`/`--pyfile` pair. Exactly one must be given.
    pub fn from_flags(
        notebook: Option<PathBuf>,
        pyfile: Option<PathBuf>,
    ) -> Result<Self, GradeError> {
        match (notebook, pyfile) {
            (Some(nb), None) => Ok(Self::Notebook(nb)),
            (None, Some(py)) => Ok(Self::Script(py)),
            (Some(_), Some(_)) => Err(GradeError::Usage(
                "--notebook and --pyfile cannot be used together".to_string(),
            )),
            (None, None) => Err(GradeError::Usage(
                "expected a submission: pass either --notebook or --pyfile".to_string(),
            )),
        }
    }

    /// Path of the submission file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Notebook(p) | Self::Script(p) => p,
        }
    }
}

/// Decodes bytes as UTF-8, falling back to Latin-1 for legacy files.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Reads a whole text file, mapping failures into the run's taxonomy.
pub fn read_text_file(path: &Path) -> Result<String, GradeError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(decode_text(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(GradeError::InputNotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(GradeError::InputRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads the assignment requirements file.
pub fn load_assignment(path: &Path) -> Result<AssignmentSpec, GradeError> {
    let text = read_text_file(path)?;
    if text.trim().is_empty() {
        return Err(GradeError::EmptyInput {
            what: "assignment requirements",
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), chars = text.len(), "Read assignment requirements");
    Ok(AssignmentSpec(text))
}

/// Reads the student's code from a notebook or a script.
pub fn load_submission(source: &SubmissionSource) -> Result<SubmissionCode, GradeError> {
    let path = source.path();
    let raw = read_text_file(path)?;

    let code = match source {
        SubmissionSource::Notebook(_) => {
            let code = notebook::extract_code(&raw).map_err(|source| GradeError::InputParse {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::info!("Extracted code from notebook: {}", path.display());
            code
        }
        SubmissionSource::Script(_) => {
            tracing::info!("Read Python file: {}", path.display());
            raw
        }
    };

    if code.trim().is_empty() {
        return Err(GradeError::EmptyInput {
            what: "student code",
            path: path.to_path_buf(),
        });
    }

    Ok(SubmissionCode(code))
}
