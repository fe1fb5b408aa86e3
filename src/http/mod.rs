//! HTTP boundary subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: timeout, request ID, trace)
//!     → handlers.rs (POST /chat, GET /health)
//!     → gatekeeper pipeline
//!     → error.rs (fixed caller-facing response shapes)
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
