//! Shared utilities for integration testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpListener;

use chat_gateway::config::GatewayConfig;
use chat_gateway::gatekeeper::ChatMessage;
use chat_gateway::http::HttpServer;
use chat_gateway::lifecycle::Shutdown;
use chat_gateway::providers::{
    CompletionProvider, GenerationParams, ModerationProvider, ModerationVerdict, ProviderError,
};
use chat_gateway::security::RateLimiter;

/// Moderation stub with an observable call count.
pub struct StubModeration {
    pub flagged: AtomicBool,
    pub calls: AtomicUsize,
}

impl StubModeration {
    pub fn new(flagged: bool) -> Arc<Self> {
        Arc::new(Self {
            flagged: AtomicBool::new(flagged),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ModerationProvider for StubModeration {
    async fn moderate(&self, _input: &str) -> Result<ModerationVerdict, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let flagged = self.flagged.load(Ordering::SeqCst);
        Ok(ModerationVerdict {
            flagged,
            raw: serde_json::json!({ "flagged": flagged }),
        })
    }
}

/// Completion stub that records how much context it was given.
pub struct StubCompletion {
    pub reply: String,
    pub calls: AtomicUsize,
    pub last_context_len: AtomicUsize,
}

impl StubCompletion {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_context_len: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CompletionProvider for StubCompletion {
    async fn complete(
        &self,
        _system_prompt: &str,
        context: &[ChatMessage],
        _params: &GenerationParams,
        _user: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_context_len.store(context.len(), Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Completion stub that always fails at the transport layer.
#[allow(dead_code)]
pub struct FailingCompletion;

#[async_trait]
impl CompletionProvider for FailingCompletion {
    async fn complete(
        &self,
        _system_prompt: &str,
        _context: &[ChatMessage],
        _params: &GenerationParams,
        _user: &str,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            status: 502,
            body: "upstream exploded".to_string(),
        })
    }
}

/// Spawn a gateway on an ephemeral port with the given collaborators.
/// Returns the base URL and the shutdown coordinator.
pub async fn spawn_gateway(
    config: GatewayConfig,
    moderation: Arc<dyn ModerationProvider>,
    completion: Arc<dyn CompletionProvider>,
) -> (String, Arc<Shutdown>) {
    let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
    let server = HttpServer::new(&config, limiter, moderation, completion);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Arc::new(Shutdown::new());
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (format!("http://{addr}"), shutdown)
}
