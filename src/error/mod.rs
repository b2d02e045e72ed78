//! Error types for ollama-bridge.

use std::time::Duration;

use thiserror::Error;

/// Primary error type for all bridge operations.
///
/// A non-success HTTP status is not an error here: the handler reports it
/// through the diagnostic sink and yields an empty stream.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connect failure or a failed body read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Ollama request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Broad error category for routing retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Timeout,
    Configuration,
}

impl BridgeError {
    /// Timeout error for the given deadline, reported in whole seconds.
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout {
            secs: duration.as_secs(),
        }
    }

    /// Whether this error represents a timeout, including one raised by the
    /// HTTP client itself.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Network(e) => e.is_timeout(),
            _ => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        if self.is_timeout() {
            return ErrorCategory::Timeout;
        }
        match self {
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Configuration(_) | Self::InvalidArgument(_) => ErrorCategory::Configuration,
        }
    }

    /// Transport failures are worth another attempt; bad configuration is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Timeout
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BridgeError>;
