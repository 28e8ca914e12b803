//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Breaker names unique and non-empty, `parent` reserved
//! - Value ranges (overhead finite and positive, limits >= -1)
//! - Addresses of enabled endpoints parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NodeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system, on startup and reload

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::NodeConfig;
use crate::service::PARENT_BREAKER_NAME;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("breaker name must not be empty")]
    EmptyBreakerName,

    #[error("breaker [{0}] is defined more than once")]
    DuplicateBreaker(String),

    #[error("breaker name [{0}] is reserved")]
    ReservedBreakerName(String),

    #[error("breaker [{name}] overhead must be a positive number, got {overhead}")]
    InvalidOverhead { name: String, overhead: f64 },

    #[error("breaker [{name}] limit must be -1 (unlimited) or >= 0, got {limit}")]
    InvalidLimit { name: String, limit: i64 },

    #[error("{field} [{value}] is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("admin.api_key must not be empty when the admin API is enabled")]
    EmptyApiKey,

    #[error("observability.stats_interval_secs must be > 0")]
    ZeroStatsInterval,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &NodeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let parent_limit = config.breakers.parent.limit.bytes();
    if parent_limit < -1 {
        errors.push(ValidationError::InvalidLimit {
            name: PARENT_BREAKER_NAME.to_string(),
            limit: parent_limit,
        });
    }

    let mut seen = HashSet::new();
    for child in &config.breakers.children {
        if child.name.trim().is_empty() {
            errors.push(ValidationError::EmptyBreakerName);
            continue;
        }
        if child.name == PARENT_BREAKER_NAME {
            errors.push(ValidationError::ReservedBreakerName(child.name.clone()));
        }
        if !seen.insert(child.name.as_str()) {
            errors.push(ValidationError::DuplicateBreaker(child.name.clone()));
        }
        if !child.overhead.is_finite() || child.overhead <= 0.0 {
            errors.push(ValidationError::InvalidOverhead {
                name: child.name.clone(),
                overhead: child.overhead,
            });
        }
        if child.limit.bytes() < -1 {
            errors.push(ValidationError::InvalidLimit {
                name: child.name.clone(),
                limit: child.limit.bytes(),
            });
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }
    if observability.stats_interval_secs == 0 {
        errors.push(ValidationError::ZeroStatsInterval);
    }

    let admin = &config.admin;
    if admin.enabled {
        if admin.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field: "admin.bind_address",
                value: admin.bind_address.clone(),
            });
        }
        if admin.api_key.is_empty() {
            errors.push(ValidationError::EmptyApiKey);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::byte_size::ByteSize;
    use crate::config::schema::ChildBreakerConfig;

    fn child(name: &str, limit: i64, overhead: f64) -> ChildBreakerConfig {
        ChildBreakerConfig {
            name: name.to_string(),
            limit: ByteSize(limit),
            overhead,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&NodeConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = NodeConfig::default();
        config.breakers.parent.limit = ByteSize(-2);
        config.breakers.children = vec![
            child("request", 100, 1.0),
            child("request", 100, 0.0),
            child("parent", -5, f64::NAN),
            child(" ", 1, 1.0),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidLimit {
            name: "parent".into(),
            limit: -2
        }));
        assert!(errors.contains(&ValidationError::DuplicateBreaker("request".into())));
        assert!(errors.contains(&ValidationError::ReservedBreakerName("parent".into())));
        assert!(errors.contains(&ValidationError::InvalidLimit {
            name: "parent".into(),
            limit: -5
        }));
        assert!(errors.contains(&ValidationError::EmptyBreakerName));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidOverhead { name, .. } if name == "request")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidOverhead { name, .. } if name == "parent")));
    }

    #[test]
    fn test_unlimited_is_valid() {
        let mut config = NodeConfig::default();
        config.breakers.parent.limit = ByteSize::UNLIMITED;
        config.breakers.children = vec![child("request", -1, 1.0)];
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_enabled_endpoints_need_addresses() {
        let mut config = NodeConfig::default();
        config.admin.enabled = true;
        config.admin.bind_address = "not-an-address".into();
        config.admin.api_key.clear();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nope".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptyApiKey));
    }
}
