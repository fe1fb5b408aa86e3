//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the chat gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Chat pipeline configuration (input/output bounds, redirect text).
    pub chat: ChatConfig,

    /// Topic classifier rule set.
    pub topic: TopicConfig,

    /// Completion/moderation provider settings.
    pub provider: ProviderConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Rate limiting configuration.
///
/// Fixed-window counters keyed by client token. The defaults allow one
/// request per five-second window per token.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in milliseconds.
    pub interval_ms: u64,

    /// Maximum requests per window per token.
    pub max_requests: u32,

    /// How often the stale-entry sweeper runs, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            max_requests: 1,
            sweep_interval_secs: 60,
        }
    }
}

/// Chat pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum accepted length of the inbound message, in characters.
    /// Chosen as a rough proxy for ~100 tokens.
    pub max_input_chars: usize,

    /// Maximum length of the outbound reply before truncation, in characters.
    pub max_output_chars: usize,

    /// Number of trailing conversation messages forwarded as context,
    /// inclusive of the current message.
    pub context_messages: usize,

    /// Canned redirect returned for off-topic and moderation-flagged input.
    /// The same string is used for both so callers cannot probe the
    /// moderation boundary.
    pub redirect: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 400,
            max_output_chars: 500,
            context_messages: 5,
            redirect: "I'm here to help with questions about MedNavi's dental \
                       practice analytics. Ask me about practice performance, \
                       revenue tracking, or patient insights!"
                .to_string(),
        }
    }
}

/// Topic classifier rule set.
///
/// A message is on-topic when any keyword appears as a substring, when it
/// starts with a question prefix, or when it contains an explanatory or
/// comparison cue. Matching is case-insensitive.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Domain vocabulary matched as substrings.
    pub keywords: Vec<String>,

    /// Interrogative prefixes matched at the start of the message.
    pub question_prefixes: Vec<String>,

    /// Explanatory cues matched anywhere in the message.
    pub explanatory_cues: Vec<String>,

    /// Comparison cues matched anywhere in the message.
    pub comparison_cues: Vec<String>,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "mednavi",
                "dental",
                "dentist",
                "practice",
                "patient",
                "revenue",
                "production",
                "collection",
                "analytics",
                "dashboard",
                "insight",
                "report",
                "metric",
                "kpi",
                "trend",
                "performance",
                "growth",
                "roi",
                "appointment",
                "scheduling",
                "hygiene",
                "treatment",
                "recall",
                "retention",
                "claim",
                "insurance",
                "chair",
                "demo",
                "pricing",
                "feature",
                "integration",
                "data",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            question_prefixes: ["how", "what", "can", "does"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            explanatory_cues: ["explain", "tell me about"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            comparison_cues: ["compare", "difference", "versus", "vs"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Completion/moderation provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Completion model name.
    pub model: String,

    /// Moderation model name.
    pub moderation_model: String,

    /// Outbound request timeout in seconds.
    pub timeout_secs: u64,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,

    /// Presence penalty.
    pub presence_penalty: f32,

    /// Frequency penalty.
    pub frequency_penalty: f32,

    /// Product persona and knowledge base sent as the system prompt.
    /// The gatekeeper appends a hard off-topic instruction at runtime.
    pub system_prompt: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            moderation_model: "omni-moderation-latest".to_string(),
            timeout_secs: 30,
            temperature: 0.7,
            max_tokens: 120,
            presence_penalty: 0.6,
            frequency_penalty: 0.2,
            system_prompt: "You are the MedNavi assistant. MedNavi is a dental \
                practice analytics platform that turns practice-management \
                data into actionable insights: revenue and production \
                tracking, collections, scheduling efficiency, hygiene \
                reappointment, patient retention, and insurance claim \
                performance. Answer briefly and concretely, and stay focused \
                on MedNavi and dental practice analytics."
                .to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
