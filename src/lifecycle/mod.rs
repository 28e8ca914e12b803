//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (breaker-node main):
//!     Load config → Validate → Build breaker hierarchy → Start watcher,
//!     stats reporter and admin API
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Background tasks exit → Process exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Reload breaker settings
//! ```
//!
//! # Design Decisions
//! - Breakers exist before any background task starts
//! - Breaker usage is never persisted; it lives as long as the process

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
