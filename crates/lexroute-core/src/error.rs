//! Error types for LexRoute Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Routing errors
    #[error("Provider not configured: {provider_id}")]
    ProviderNotConfigured { provider_id: String },

    #[error(
        "Context window exceeded: {estimated_tokens} estimated tokens, largest window is {largest_window}"
    )]
    ContextWindowExceeded {
        estimated_tokens: u32,
        largest_window: u32,
    },

    // Provider call errors
    #[error("Provider call failed ({provider_id}): {message}")]
    ProviderCall {
        provider_id: String,
        retryable: bool,
        message: String,
    },

    #[error("Provider call timed out ({provider_id}) after {timeout_secs}s")]
    ProviderTimeout {
        provider_id: String,
        timeout_secs: u64,
    },

    // Configuration errors
    #[error("Registry misconfigured: {0}")]
    RegistryMisconfigured(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the dispatch layer may retry the failed operation.
    ///
    /// Only transient provider failures qualify; routing and configuration
    /// errors are deterministic and retrying them cannot succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::ProviderCall { retryable, .. } => *retryable,
            Error::ProviderTimeout { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
