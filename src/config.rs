#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Provider selection, credentials and request tuning.

use std::{fmt, str::FromStr};

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Default OpenAI chat model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default sampling temperature sent to either provider.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 700;

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the OpenAI key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable holding the Gemini key.
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

/// The remote text-generation services a run can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions.
    #[default]
    OpenAi,
    /// Google Gemini `generateContent`.
    Gemini,
}

impl ProviderKind {
    /// Environment variable the provider's credential is read from.
    pub fn key_var(self) -> &'static str {
        match self {
            Self::OpenAi => OPENAI_KEY_VAR,
            Self::Gemini => GEMINI_KEY_VAR,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(format!("unknown provider `{other}`, expected `openai` or `gemini`")),
        }
    }
}

/// Reads a non-blank, trimmed environment variable.
fn env_value(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// OpenAI connection details.
#[derive(Clone)]
pub struct OpenAiEnv {
    /// Base URL for the OpenAI-compatible API endpoint.
    api_base: String,
    /// API key used to authenticate requests.
    api_key:  String,
}

impl OpenAiEnv {
    /// Creates connection details for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_OPENAI_ENDPOINT.to_string(),
            api_key:  api_key.into(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Reads `OPENAI_API_KEY` and the optional `OPENAI_ENDPOINT`.
    fn from_env() -> Option<Self> {
        let env = Self::new(env_value(OPENAI_KEY_VAR)?);
        Some(match env_value("OPENAI_ENDPOINT") {
            Some(base) => env.with_api_base(base),
            None => env,
        })
    }

    /// Returns the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for OpenAiEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiEnv")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Gemini connection details.
#[derive(Clone)]
pub struct GeminiEnv {
    /// Base URL for the Generative Language API.
    api_base: String,
    /// API key sent in the `x-goog-api-key` header.
    api_key:  String,
}

impl GeminiEnv {
    /// Creates connection details for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_GEMINI_ENDPOINT.to_string(),
            api_key:  api_key.into(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Reads `GEMINI_API_KEY` and the optional `GEMINI_ENDPOINT`.
    fn from_env() -> Option<Self> {
        let env = Self::new(env_value(GEMINI_KEY_VAR)?);
        Some(match env_value("GEMINI_ENDPOINT") {
            Some(base) => env.with_api_base(base),
            None => env,
        })
    }

    /// Returns the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for GeminiEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiEnv")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Credentials for both providers, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// OpenAI details, if a key is configured.
    openai: Option<OpenAiEnv>,
    /// Gemini details, if a key is configured.
    gemini: Option<GeminiEnv>,
}

impl Credentials {
    /// Bundles explicitly provided credentials.
    pub fn new(openai: Option<OpenAiEnv>, gemini: Option<GeminiEnv>) -> Self {
        Self { openai, gemini }
    }

    /// Reads both credentials from the process environment. Callers load
    /// `.env` beforehand.
    pub fn from_env() -> Self {
        Self {
            openai: OpenAiEnv::from_env(),
            gemini: GeminiEnv::from_env(),
        }
    }

    /// Returns the OpenAI details, if configured.
    pub fn openai(&self) -> Option<&OpenAiEnv> {
        self.openai.as_ref()
    }

    /// Returns the Gemini details, if configured.
    pub fn gemini(&self) -> Option<&GeminiEnv> {
        self.gemini.as_ref()
    }
}

/// Which provider to call and how to tune the request.
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct ProviderSettings {
    /// Selected provider.
    #[builder(default)]
    kind:         ProviderKind,
    /// OpenAI model name.
    #[builder(default = DEFAULT_OPENAI_MODEL.to_string())]
    openai_model: String,
    /// Gemini model name.
    #[builder(default = DEFAULT_GEMINI_MODEL.to_string())]
    gemini_model: String,
    /// Sampling temperature.
    #[builder(default = DEFAULT_TEMPERATURE)]
    temperature:  f32,
    /// Maximum number of generated tokens.
    #[builder(default = DEFAULT_MAX_TOKENS)]
    max_tokens:   u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ProviderSettings {
    /// Returns the selected provider.
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Returns the model name for the selected provider.
    pub fn model(&self) -> &str {
        match self.kind {
            ProviderKind::OpenAi => &self.openai_model,
            ProviderKind::Gemini => &self.gemini_model,
        }
    }

    /// Returns the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Returns the token cap.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_round_trips_through_text() {
        for kind in [ProviderKind::OpenAi, ProviderKind::Gemini] {
            assert_eq!(kind.to_string().parse::<ProviderKind>(), Ok(kind));
        }
        assert_eq!(" Gemini ".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
        assert!("anthropic".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn settings_pick_model_for_selected_provider() {
        let defaults = ProviderSettings::default();
        assert_eq!(defaults.kind(), ProviderKind::OpenAi);
        assert_eq!(defaults.model(), DEFAULT_OPENAI_MODEL);

        let gemini = ProviderSettings::builder()
            .kind(ProviderKind::Gemini)
            .gemini_model("gemini-2.0-flash")
            .build();
        assert_eq!(gemini.model(), "gemini-2.0-flash");
        assert_eq!(gemini.max_tokens(), DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn debug_output_hides_keys() {
        let creds = Credentials::new(
            Some(OpenAiEnv::new("sk-secret")),
            Some(GeminiEnv::new("AIza-secret")),
        );
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("AIza-secret"));
    }
}
