//! Egress error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EgressError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status_code}: {message}")]
    Provider { status_code: u16, message: String },

    #[error("Rate limit exceeded{}", retry_after_secs.map(|s| format!(": retry after {}s", s)).unwrap_or_default())]
    RateLimitExceeded { retry_after_secs: Option<u64> },

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EgressError {
    /// Whether this failure class is worth retrying.
    ///
    /// Transient network faults, rate limits, timeouts, and 5xx-class
    /// responses are retryable; client errors and parse failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            EgressError::Http(err) => err.is_connect() || err.is_timeout() || err.is_request(),
            EgressError::Provider { status_code, .. } => {
                matches!(status_code, 500 | 502 | 503 | 504)
            }
            EgressError::RateLimitExceeded { .. } => true,
            EgressError::Timeout(_) => true,
            EgressError::Parse(_) | EgressError::Config(_) => false,
        }
    }

    /// Convert into the shared error taxonomy, attaching the provider id.
    pub fn into_core(self, provider_id: &str) -> lexroute_core::Error {
        match self {
            EgressError::Timeout(timeout_secs) => lexroute_core::Error::ProviderTimeout {
                provider_id: provider_id.to_string(),
                timeout_secs,
            },
            other => lexroute_core::Error::ProviderCall {
                provider_id: provider_id.to_string(),
                retryable: other.is_retryable(),
                message: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, EgressError>;
