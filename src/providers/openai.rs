//! OpenAI-compatible client for moderation and chat completion.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::gatekeeper::ChatMessage;
use crate::providers::{
    CompletionProvider, GenerationParams, ModerationProvider, ModerationVerdict, ProviderError,
};

/// Client for an OpenAI-compatible API, implementing both provider seams.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    moderation_model: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key and provider settings.
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            moderation_model: config.moderation_model.clone(),
        })
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(ProviderError::Status { status, body });
        }

        Ok(response)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    presence_penalty: f32,
    frequency_penalty: f32,
    user: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Serialize)]
struct ModerationRequest {
    model: String,
    input: String,
}

#[derive(Deserialize)]
struct ModerationResponse {
    results: Vec<serde_json::Value>,
}

#[async_trait]
impl ModerationProvider for OpenAiClient {
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict, ProviderError> {
        let body = ModerationRequest {
            model: self.moderation_model.clone(),
            input: input.to_string(),
        };

        let response = self.post_json("/moderations", &body).await?;
        let parsed: ModerationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("empty moderation results".to_string()))?;

        let flagged = result
            .get("flagged")
            .and_then(|v| v.as_bool())
            .ok_or_else(|| ProviderError::Malformed("missing flagged field".to_string()))?;

        Ok(ModerationVerdict {
            flagged,
            raw: result,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        context: &[ChatMessage],
        params: &GenerationParams,
        user: &str,
    ) -> Result<String, ProviderError> {
        let mut messages = Vec::with_capacity(context.len() + 1);
        messages.push(WireMessage {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        });
        for message in context {
            messages.push(WireMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            });
        }

        let body = CompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            presence_penalty: params.presence_penalty,
            frequency_penalty: params.frequency_penalty,
            user: user.to_string(),
        };

        let response = self.post_json("/chat/completions", &body).await?;
        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Malformed("no choices in completion".to_string()))
    }
}
