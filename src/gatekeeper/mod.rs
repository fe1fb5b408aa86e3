//! Request gatekeeping subsystem — the core of the gateway.
//!
//! # Data Flow
//! ```text
//! POST /chat body
//!     → rate limit (security::rate_limit, consumes a slot)
//!     → length check (reject > max_input_chars)
//!     → topic.rs (pure classifier; off-topic → canned redirect)
//!     → moderation provider (flagged → same canned redirect)
//!     → context trimming (last N messages)
//!     → completion provider (bounded generation parameters)
//!     → response truncation (max_output_chars + ellipsis)
//! ```
//!
//! # Design Decisions
//! - Stages run strictly in order; each is a cheaper short-circuit than
//!   the next and none may be skipped
//! - Off-topic and moderation-flagged input resolve to the identical
//!   redirect string so the moderation boundary cannot be probed
//! - No retries: a failed provider call fails the whole request

pub mod pipeline;
pub mod topic;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use pipeline::Gatekeeper;
pub use topic::TopicFilter;

use crate::providers::ProviderError;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Terminal outcome of a successfully handled request.
///
/// Both variants serialize to the same `{ "content": ... }` wire shape;
/// the distinction exists so tests and metrics can tell the paths apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A (possibly truncated) model reply.
    Answer(String),
    /// The canned redirect for off-topic or flagged input.
    Redirect(String),
}

impl Outcome {
    /// Consume the outcome, yielding the outbound content string.
    pub fn into_content(self) -> String {
        match self {
            Outcome::Answer(content) | Outcome::Redirect(content) => content,
        }
    }

    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Answer(_) => "answer",
            Outcome::Redirect(_) => "redirect",
        }
    }
}

/// Terminal failure of the pipeline.
///
/// The display strings are the exact caller-facing messages; provider
/// detail stays in the `Upstream` source and is only ever logged.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Rate limit exceeded. Please wait 5 seconds.")]
    RateLimited,

    #[error("Message too long. Please keep your message shorter.")]
    MessageTooLong,

    #[error("There was an error processing your request")]
    EmptyConversation,

    #[error("There was an error processing your request")]
    Upstream(#[source] ProviderError),
}

impl GatewayError {
    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            GatewayError::RateLimited => "rate_limited",
            GatewayError::MessageTooLong => "too_long",
            GatewayError::EmptyConversation => "empty",
            GatewayError::Upstream(_) => "upstream_error",
        }
    }
}
