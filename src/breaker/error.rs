//! Breaker error types.

use std::fmt;
use thiserror::Error;

use crate::config::byte_size::ByteSize;

/// Where a trip originated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripSource {
    /// The named breaker's own limit was exceeded.
    Local(String),
    /// The aggregate limit across the hierarchy was exceeded.
    Parent,
}

impl TripSource {
    /// Metric label for this source.
    pub fn as_label(&self) -> &'static str {
        match self {
            TripSource::Local(_) => "local",
            TripSource::Parent => "parent",
        }
    }
}

impl fmt::Display for TripSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripSource::Local(name) => write!(f, "[{}]", name),
            TripSource::Parent => write!(f, "[parent]"),
        }
    }
}

/// A rejected memory estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitBreakingError {
    /// Caller-supplied context for the memory being accounted.
    pub label: String,
    /// Bytes the caller asked to account.
    pub bytes_requested: i64,
    /// Limit that was exceeded.
    pub limit: i64,
    /// Usage immediately before the rejected addition. For parent trips this
    /// is the aggregate, overhead included.
    pub used: i64,
    pub origin: TripSource,
}

impl CircuitBreakingError {
    pub fn new(
        label: impl Into<String>,
        bytes_requested: i64,
        limit: i64,
        used: i64,
        origin: TripSource,
    ) -> Self {
        Self {
            label: label.into(),
            bytes_requested,
            limit,
            used,
            origin,
        }
    }

    pub fn is_parent(&self) -> bool {
        self.origin == TripSource::Parent
    }
}

impl fmt::Display for CircuitBreakingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Data too large, data for field [{}] would be larger than limit of [{}/{}], \
             requested [{}/{}], used [{}/{}]",
            self.origin,
            self.label,
            self.limit,
            ByteSize(self.limit),
            self.bytes_requested,
            ByteSize(self.bytes_requested),
            self.used,
            ByteSize(self.used),
        )
    }
}

impl std::error::Error for CircuitBreakingError {}

/// Errors returned by breakers and the hierarchy service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BreakerError {
    #[error(transparent)]
    CircuitBreaking(#[from] CircuitBreakingError),

    #[error("no breaker registered under name [{name}]")]
    NotFound { name: String },

    #[error("negative estimate [{bytes}] for field [{label}]")]
    NegativeEstimate { label: String, bytes: i64 },

    #[error("breaker [{name}] registered more than once")]
    DuplicateBreaker { name: String },
}

impl BreakerError {
    /// Returns the trip details when this error is a circuit breaking rejection.
    pub fn as_circuit_breaking(&self) -> Option<&CircuitBreakingError> {
        match self {
            BreakerError::CircuitBreaking(e) => Some(e),
            _ => None,
        }
    }
}
