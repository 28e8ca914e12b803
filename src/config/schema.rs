//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a breaker node.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::breaker::BreakerSettings;
use crate::config::byte_size::ByteSize;

/// Root configuration for a breaker node.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NodeConfig {
    /// Memory breaker limits.
    pub breakers: BreakerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Breaker hierarchy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Aggregate limit across all child breakers.
    pub parent: ParentBreakerConfig,

    /// Named child breakers.
    pub children: Vec<ChildBreakerConfig>,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            parent: ParentBreakerConfig::default(),
            children: vec![
                ChildBreakerConfig {
                    name: "fielddata".to_string(),
                    limit: ByteSize::mb(600),
                    overhead: 1.03,
                },
                ChildBreakerConfig {
                    name: "request".to_string(),
                    limit: ByteSize::mb(400),
                    overhead: 1.0,
                },
            ],
        }
    }
}

/// Parent (aggregate) breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParentBreakerConfig {
    /// Total limit; `-1` disables the aggregate check.
    pub limit: ByteSize,
}

impl Default for ParentBreakerConfig {
    fn default() -> Self {
        Self {
            limit: ByteSize::mb(700),
        }
    }
}

/// A single named breaker.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChildBreakerConfig {
    /// Unique breaker name (e.g. "fielddata", "request").
    pub name: String,

    /// Limit; `-1` disables the local check.
    pub limit: ByteSize,

    /// Multiplier applied to estimates at check time (default: 1.0).
    #[serde(default = "default_overhead")]
    pub overhead: f64,
}

fn default_overhead() -> f64 {
    1.0
}

impl From<&ChildBreakerConfig> for BreakerSettings {
    fn from(config: &ChildBreakerConfig) -> Self {
        BreakerSettings::new(config.name.clone(), config.limit.bytes(), config.overhead)
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

    /// Interval between breaker gauge updates in seconds.
    pub stats_interval_secs: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
            stats_interval_secs: 10,
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
