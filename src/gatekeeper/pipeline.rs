//! The request gatekeeping pipeline.
//!
//! Decides whether an inbound chat message is eligible for a model
//! completion, enforces resource limits, and shapes the final response.
//! Stage order is fixed: rate → length → topic → moderation → trimming →
//! completion → bounding. Each stage is a cheaper short-circuit than the
//! next, so none may be reordered.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::gatekeeper::{ChatMessage, GatewayError, Outcome, TopicFilter};
use crate::providers::{CompletionProvider, GenerationParams, ModerationProvider};
use crate::security::{Decision, RateLimiter};

/// The gatekeeping pipeline.
///
/// Holds the classifier, the rate limiter, and the two provider seams.
/// One instance is shared across all request handlers.
pub struct Gatekeeper {
    limiter: Arc<RateLimiter>,
    topic: TopicFilter,
    moderation: Arc<dyn ModerationProvider>,
    completion: Arc<dyn CompletionProvider>,
    params: GenerationParams,
    system_prompt: String,
    redirect: String,
    max_input_chars: usize,
    max_output_chars: usize,
    context_messages: usize,
}

impl Gatekeeper {
    /// Assemble the pipeline from configuration and injected collaborators.
    pub fn new(
        config: &GatewayConfig,
        limiter: Arc<RateLimiter>,
        moderation: Arc<dyn ModerationProvider>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        // The hard off-topic instruction is appended once, here, so the
        // provider always sees persona + knowledge base + guardrail.
        let system_prompt = format!(
            "{}\n\nIf the user's message is not about MedNavi or dental \
             practice analytics, reply with exactly this and nothing else: \
             \"{}\"",
            config.provider.system_prompt, config.chat.redirect
        );

        Self {
            limiter,
            topic: TopicFilter::from_config(&config.topic),
            moderation,
            completion,
            params: GenerationParams {
                temperature: config.provider.temperature,
                max_tokens: config.provider.max_tokens,
                presence_penalty: config.provider.presence_penalty,
                frequency_penalty: config.provider.frequency_penalty,
            },
            system_prompt,
            redirect: config.chat.redirect.clone(),
            max_input_chars: config.chat.max_input_chars,
            max_output_chars: config.chat.max_output_chars,
            context_messages: config.chat.context_messages,
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// A rate-limit slot is consumed before the length and topic checks,
    /// so rejected requests still count against the caller's quota.
    pub async fn handle(
        &self,
        conversation: &[ChatMessage],
        client_token: &str,
    ) -> Result<Outcome, GatewayError> {
        // 1. Rate limiting
        if self.limiter.check(client_token) == Decision::Limited {
            tracing::warn!(client = %client_token, "Rate limit exceeded");
            return Err(GatewayError::RateLimited);
        }

        let last = conversation.last().ok_or(GatewayError::EmptyConversation)?;

        // 2. Length check
        if last.content.chars().count() > self.max_input_chars {
            tracing::debug!(
                client = %client_token,
                length = last.content.chars().count(),
                limit = self.max_input_chars,
                "Message too long"
            );
            return Err(GatewayError::MessageTooLong);
        }

        // 3. Topic validation (terminal success, not an error)
        if !self.topic.is_on_topic(&last.content) {
            tracing::debug!(client = %client_token, "Off-topic message, redirecting");
            return Ok(Outcome::Redirect(self.redirect.clone()));
        }

        // 4. Content moderation. Flagged input gets the same redirect as
        // off-topic input so the caller cannot tell the paths apart.
        let verdict = self
            .moderation
            .moderate(&last.content)
            .await
            .map_err(|e| {
                tracing::error!(client = %client_token, error = %e, "Moderation call failed");
                crate::observability::metrics::record_provider_error("moderation");
                GatewayError::Upstream(e)
            })?;

        if verdict.flagged {
            tracing::info!(client = %client_token, verdict = %verdict.raw, "Message flagged, redirecting");
            return Ok(Outcome::Redirect(self.redirect.clone()));
        }

        // 5. Context trimming
        let start = conversation.len().saturating_sub(self.context_messages);
        let context = &conversation[start..];

        // 6. Completion request
        let reply = self
            .completion
            .complete(&self.system_prompt, context, &self.params, client_token)
            .await
            .map_err(|e| {
                tracing::error!(client = %client_token, error = %e, "Completion call failed");
                crate::observability::metrics::record_provider_error("completion");
                GatewayError::Upstream(e)
            })?;

        // 7. Response bounding
        Ok(Outcome::Answer(truncate_reply(
            reply,
            self.max_output_chars,
        )))
    }
}

/// Truncate a reply to `limit` characters, appending an ellipsis marker.
/// Counts characters, not bytes, so the cut never splits a code point.
fn truncate_reply(reply: String, limit: usize) -> String {
    if reply.chars().count() <= limit {
        return reply;
    }
    let mut bounded: String = reply.chars().take(limit).collect();
    bounded.push_str("...");
    bounded
}
