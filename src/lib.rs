//! MedNavi Chat Gateway Library

pub mod config;
pub mod gatekeeper;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod providers;
pub mod security;

pub use config::schema::GatewayConfig;
pub use gatekeeper::Gatekeeper;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
