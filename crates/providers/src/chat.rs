use crate::error::{ProviderError, Result};
use crate::openai::{OpenAiClient, OpenAiConfig};
use async_trait::async_trait;
use serde_json::json;

/// A single-turn completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Request with deterministic sampling
    pub fn deterministic(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.0,
        }
    }
}

/// Generates free text from a prompt
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_id(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// OpenAI-compatible `/chat/completions` client
pub struct OpenAiChatModel {
    client: OpenAiClient,
    model: String,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiConfig, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: OpenAiClient::new(config)?,
            model: model.into(),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = json!({
            "model": self.model,
            "temperature": request.temperature,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
        });

        let value = self.client.post_json("/chat/completions", &body).await?;
        let choice = value["choices"]
            .get(0)
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".into()))?;

        choice["message"]["content"]
            .as_str()
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ProviderError::InvalidResponse("Choice has no message content".into()))
    }
}
