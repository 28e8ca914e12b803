//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, byte_size.rs for limits)
//!     → validation.rs (semantic checks)
//!     → NodeConfig (validated, immutable)
//!     → HierarchyBreakerService::from_config
//!
//! On file change or SIGHUP:
//!     watcher.rs ConfigReloader
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → HierarchyBreakerService::apply_config swaps breaker limits
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Reload replaces limits and overheads only, never breaker usage

pub mod byte_size;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use byte_size::ByteSize;
pub use schema::NodeConfig;
pub use schema::BreakerConfig;
pub use schema::ChildBreakerConfig;
pub use schema::ParentBreakerConfig;
pub use schema::ObservabilityConfig;
pub use schema::AdminConfig;
