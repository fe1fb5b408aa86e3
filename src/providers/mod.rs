//! External provider subsystem.
//!
//! # Data Flow
//! ```text
//! Gatekeeper pipeline:
//!     → ModerationProvider::moderate (flagged / not flagged)
//!     → CompletionProvider::complete (generated reply)
//!
//! Both seams are traits so the pipeline is testable without a network.
//! openai.rs implements both against an OpenAI-compatible API.
//! ```
//!
//! # Design Decisions
//! - Provider failures never reach the caller verbatim; the gatekeeper
//!   logs the detail and surfaces one generic error shape
//! - No retries: a failed provider call fails the whole request

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiClient;

use crate::gatekeeper::ChatMessage;

/// Verdict returned by the moderation provider.
///
/// `raw` carries the opaque provider payload for server-side logging; it is
/// never forwarded to the caller.
#[derive(Debug, Clone)]
pub struct ModerationVerdict {
    pub flagged: bool,
    pub raw: serde_json::Value,
}

/// Generation parameters forwarded to the completion provider.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

/// Error type for provider calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Flags text as policy-violating or acceptable.
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict, ProviderError>;
}

/// Generates a reply given a system prompt and trimmed message history.
///
/// `user` is the caller identity, forwarded for provider-side auditing.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        context: &[ChatMessage],
        params: &GenerationParams,
        user: &str,
    ) -> Result<String, ProviderError>;
}
