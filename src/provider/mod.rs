#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Remote text-generation providers.

/// Google Gemini over HTTP
pub mod gemini;
/// OpenAI chat completions
pub mod openai;

use std::future::Future;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use crate::{
    config::{Credentials, ProviderKind, ProviderSettings},
    error::GradeError,
};

/// Something that turns a prompt into free text.
///
/// Implementations make exactly one remote call per `generate` and never
/// retry.
pub trait Provider {
    /// Which service this is.
    fn kind(&self) -> ProviderKind;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Sends `prompt` and returns the raw reply text.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GradeError>>;
}

/// The provider selected for this run.
#[derive(Clone)]
pub enum Grader {
    /// OpenAI chat completions.
    OpenAi(OpenAiProvider),
    /// Google Gemini.
    Gemini(GeminiProvider),
}

impl Grader {
    /// Builds the provider named by `settings`. Fails without touching the
    /// network if its credential is missing.
    pub fn from_settings(
        settings: &ProviderSettings,
        credentials: &Credentials,
    ) -> Result<Self, GradeError> {
        let kind = settings.kind();
        let missing = || GradeError::MissingCredential {
            provider: kind,
            var:      kind.key_var(),
        };

        let grader = match kind {
            ProviderKind::OpenAi => {
                let env = credentials.openai().ok_or_else(missing)?;
                Self::OpenAi(OpenAiProvider::new(
                    env,
                    settings.model(),
                    settings.temperature(),
                    settings.max_tokens(),
                ))
            }
            ProviderKind::Gemini => {
                let env = credentials.gemini().ok_or_else(missing)?;
                Self::Gemini(GeminiProvider::new(
                    env,
                    settings.model(),
                    settings.temperature(),
                    settings.max_tokens(),
                )?)
            }
        };

        tracing::info!("Using {} provider: {}", grader.kind(), grader.model());
        Ok(grader)
    }
}

impl Provider for Grader {
    fn kind(&self) -> ProviderKind {
        match self {
            Self::OpenAi(p) => p.kind(),
            Self::Gemini(p) => p.kind(),
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::OpenAi(p) => p.model(),
            Self::Gemini(p) => p.model(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, GradeError> {
        match self {
            Self::OpenAi(p) => p.generate(prompt).await,
            Self::Gemini(p) => p.generate(prompt).await,
        }
    }
}
