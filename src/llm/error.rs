//! Errors produced while talking to the LLM endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur during backend operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendError {
    /// The endpoint answered with a non-success status
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Connection-level failure (DNS, refused, reset, TLS)
    NetworkError { message: String },

    /// The response body could not be decoded
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    /// A 2xx response that carried no generated text
    EmptyGeneration { finish_reason: Option<String> },

    /// Client could not be constructed (bad endpoint, TLS backend, etc.)
    ConfigurationError { message: String },
}

impl BackendError {
    /// True for failures where no usable HTTP exchange happened
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BackendError::ApiError { .. }
                | BackendError::TimeoutError { .. }
                | BackendError::NetworkError { .. }
        )
    }

    /// Short class name used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::ApiError { .. } => "api",
            BackendError::TimeoutError { .. } => "timeout",
            BackendError::NetworkError { .. } => "network",
            BackendError::InvalidResponse { .. } => "invalid_response",
            BackendError::EmptyGeneration { .. } => "empty_generation",
            BackendError::ConfigurationError { .. } => "configuration",
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            BackendError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            BackendError::InvalidResponse { message, .. } => {
                write!(f, "Invalid response from LLM: {}", message)
            }
            BackendError::EmptyGeneration { finish_reason } => write!(
                f,
                "LLM response text was empty. Finish reason: {}",
                finish_reason.as_deref().unwrap_or("UNKNOWN")
            ),
            BackendError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}
