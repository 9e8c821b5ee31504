//! Provider Error Types
//!
//! Unified error handling for marketplace calls and model handlers.

use std::fmt;

use crate::wallet::WalletError;

/// Errors that can occur when calling the AiMo marketplace
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// Configuration is unusable (bad base URL, client construction failed, ...)
    Config(String),

    /// Wallet configuration or signing failed
    Wallet(WalletError),

    /// Network-related errors (connection failed, DNS, ...)
    Network(String),

    /// Operation timed out
    Timeout(String),

    /// Marketplace returned a non-success status
    Api { status: u16, message: String },

    /// Response parsing failed
    Parse(String),

    /// Response was well formed but unusable
    InvalidResponse(String),

    /// Request does not fit the model kind it was sent to
    InvalidRequest(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ProviderError::Wallet(err) => write!(f, "Wallet error: {}", err),
            ProviderError::Network(msg) => write!(f, "Network error: {}", msg),
            ProviderError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            ProviderError::Api { status, message } => {
                write!(f, "AiMo API error [{}]: {}", status, message)
            }
            ProviderError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            ProviderError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Wallet(err) => Some(err),
            _ => None,
        }
    }
}

impl From<WalletError> for ProviderError {
    fn from(err: WalletError) -> Self {
        ProviderError::Wallet(err)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_connect() {
            ProviderError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else if err.is_builder() {
            ProviderError::Config(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}
