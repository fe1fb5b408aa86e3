//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-token fixed-window quota)
//!     → Pass to gatekeeper pipeline
//! ```
//!
//! # Design Decisions
//! - Fail closed: over-quota requests are rejected before any other work
//! - Per-token atomicity without a global lock (sharded map)
//! - Stale windows are swept in the background to bound memory

pub mod rate_limit;

pub use rate_limit::{Decision, RateLimiter};
