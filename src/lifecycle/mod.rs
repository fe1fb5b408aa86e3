//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Initialize subsystems → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast signal → server drains, sweeper exits
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
