#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! OpenAI chat-completions provider.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
};

use super::Provider;
use crate::{
    config::{OpenAiEnv, ProviderKind},
    error::GradeError,
};

/// Sends prompts to an OpenAI-compatible chat endpoint.
#[derive(Clone)]
pub struct OpenAiProvider {
    /// Configured API client.
    client:      OpenAIClient<OpenAIConfig>,
    /// Chat model identifier.
    model:       String,
    /// Sampling temperature.
    temperature: f32,
    /// Completion token cap.
    max_tokens:  u32,
}

impl OpenAiProvider {
    /// Creates a provider for `model` using the given connection details.
    pub fn new(
        env: &OpenAiEnv,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        let client = OpenAIClient::with_config(
            OpenAIConfig::new()
                .with_api_base(env.api_base())
                .with_api_key(env.api_key()),
        );

        Self {
            client,
            model: model.into(),
            temperature,
            max_tokens,
        }
    }

    /// Chat request carrying `prompt` as the single user message. The token
    /// cap goes out as `max_completion_tokens` only; the legacy `max_tokens`
    /// field is rejected by newer OpenAI models when both are present.
    fn request(&self, prompt: &str) -> Result<CreateChatCompletionRequest, GradeError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()
                .map_err(openai_error)?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(openai_error)
    }
}

/// Wraps any displayable failure as an OpenAI provider error.
fn openai_error(e: impl ToString) -> GradeError {
    GradeError::provider(ProviderKind::OpenAi, e)
}

impl Provider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GradeError> {
        let request = self.request(prompt)?;
        let response = self.client.chat().create(request).await.map_err(openai_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| openai_error("response contained no message content"))
    }
}
