#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Google Gemini `generateContent` provider.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::Provider;
use crate::{
    config::{GeminiEnv, ProviderKind},
    error::GradeError,
};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    /// Conversation turns; a single user turn here.
    contents:          Vec<Content<'a>>,
    /// Sampling configuration.
    generation_config: GenerationConfig,
}

/// One conversation turn in a request.
#[derive(Debug, Serialize)]
struct Content<'a> {
    /// Text parts of the turn.
    parts: Vec<Part<'a>>,
}

/// A text part in a request.
#[derive(Debug, Serialize)]
struct Part<'a> {
    /// Prompt text.
    text: &'a str,
}

/// Tuning sent with every request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    /// Sampling temperature.
    temperature:       f32,
    /// Token cap for the reply.
    max_output_tokens: u32,
}

/// Response body; only the fields we read.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateContentResponse {
    /// Generated candidates, best first.
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    /// Candidate content; absent when generation was blocked.
    content:       Option<CandidateContent>,
    /// Why generation stopped.
    finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Deserialize)]
struct CandidateContent {
    /// Parts of the reply.
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

/// A reply part; non-text parts have no `text`.
#[derive(Debug, Deserialize)]
struct CandidatePart {
    /// Reply text.
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub(crate) fn into_text(self) -> Result<String, String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| "response contained no candidates".to_string())?;

        let finish_reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(format!("candidate contained no text (finish reason: {finish_reason})"))
        } else {
            Ok(text)
        }
    }
}

/// Sends prompts to the Gemini API over HTTP.
#[derive(Clone)]
pub struct GeminiProvider {
    /// Shared HTTP client.
    http:        Client,
    /// Connection details.
    env:         GeminiEnv,
    /// Model identifier, e.g. `gemini-1.5-flash`.
    model:       String,
    /// Sampling temperature.
    temperature: f32,
    /// Output token cap.
    max_tokens:  u32,
}

impl GeminiProvider {
    /// Creates a provider for `model` using the given connection details.
    pub fn new(
        env: &GeminiEnv,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Self, GradeError> {
        let http = Client::builder()
            .build()
            .map_err(|e| GradeError::provider(ProviderKind::Gemini, e))?;

        Ok(Self {
            http,
            env: env.clone(),
            model: model.into(),
            temperature,
            max_tokens,
        })
    }

    /// Endpoint for the configured model.
    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.env.api_base().trim_end_matches('/'),
            self.model
        )
    }
}

/// Wraps any displayable failure as a Gemini provider error.
fn gemini_error(e: impl ToString) -> GradeError {
    GradeError::provider(ProviderKind::Gemini, e)
}

impl Provider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GradeError> {
        let body = GenerateContentRequest {
            contents:          vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature:       self.temperature,
                max_output_tokens: self.max_tokens,
            },
        };

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", self.env.api_key())
            .json(&body)
            .send()
            .await
            .map_err(gemini_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(gemini_error(format!("{status}: {}", detail.trim())));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(gemini_error)?;
        parsed.into_text().map_err(gemini_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> GenerateContentResponse {
        serde_json::from_str(raw).expect("response json")
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let resp = parse(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "SCORE: 88\n"}, {"text": "GRADE: B"}], "role": "model"},
                 "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]}"#,
        );
        assert_eq!(resp.into_text().expect("text"), "SCORE: 88\nGRADE: B");
    }

    #[test]
    fn blocked_candidate_reports_finish_reason() {
        let err = parse(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#)
            .into_text()
            .expect_err("no text");
        assert!(err.contains("SAFETY"));

        assert!(parse("{}").into_text().is_err());
    }

    #[test]
    fn request_uses_camel_case_fields() {
        let body = GenerateContentRequest {
            contents:          vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature:       0.2,
                max_output_tokens: 700,
            },
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 700);
    }

    #[test]
    fn url_embeds_model_and_trims_slash() {
        let env = GeminiEnv::new("k").with_api_base("http://localhost:9/v1beta/");
        let provider = GeminiProvider::new(&env, "gemini-1.5-flash", 0.2, 10).expect("client");
        assert_eq!(
            provider.url(),
            "http://localhost:9/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
