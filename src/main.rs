//! MedNavi Chat Gateway
//!
//! An HTTP gateway that gatekeeps chat messages before proxying them to an
//! external completion provider.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                  CHAT GATEWAY                     │
//!                    │                                                   │
//!   POST /chat       │  ┌────────┐   ┌───────────┐   ┌──────────────┐   │
//!   ─────────────────┼─▶│  http  │──▶│ security  │──▶│  gatekeeper  │   │
//!                    │  │ server │   │rate limit │   │   pipeline   │   │
//!                    │  └────────┘   └───────────┘   └──────┬───────┘   │
//!                    │                                      │            │
//!                    │                                      ▼            │
//!   {content}        │                              ┌──────────────┐    │     Moderation +
//!   ◀────────────────┼──────────────────────────────│  providers   │◀───┼──── Completion
//!                    │                              │   (OpenAI)   │    │     APIs
//!                    │                              └──────────────┘    │
//!                    │                                                   │
//!                    │  ┌─────────────────────────────────────────────┐ │
//!                    │  │           Cross-Cutting Concerns             │ │
//!                    │  │  ┌────────┐ ┌─────────────┐ ┌────────────┐  │ │
//!                    │  │  │ config │ │observability│ │ lifecycle  │  │ │
//!                    │  │  └────────┘ └─────────────┘ └────────────┘  │ │
//!                    │  └─────────────────────────────────────────────┘ │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use chat_gateway::config::{load_config, GatewayConfig};
use chat_gateway::http::HttpServer;
use chat_gateway::lifecycle::Shutdown;
use chat_gateway::observability::{logging, metrics};
use chat_gateway::providers::OpenAiClient;
use chat_gateway::security::RateLimiter;

#[derive(Parser)]
#[command(name = "chat-gateway")]
#[command(about = "Chat gatekeeping gateway for MedNavi", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("chat-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_limit_interval_ms = config.rate_limit.interval_ms,
        rate_limit_quota = config.rate_limit.max_requests,
        max_input_chars = config.chat.max_input_chars,
        "Configuration loaded"
    );

    // Metrics exporter
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Provider client (implements both moderation and completion seams)
    let api_key = std::env::var(&config.provider.api_key_env).map_err(|_| {
        format!(
            "missing API key: environment variable {} is not set",
            config.provider.api_key_env
        )
    })?;
    let client = Arc::new(OpenAiClient::new(api_key, &config.provider)?);

    // Rate limiter with background sweeper
    let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
    let shutdown = Shutdown::new();
    tokio::spawn(limiter.clone().run_sweeper(shutdown.subscribe()));

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    // Create and run HTTP server
    let server = HttpServer::new(&config, limiter, client.clone(), client);
    shutdown.trigger_on_ctrl_c();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
