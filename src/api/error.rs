//! Client Error Types
//!
//! Every failure a view can surface falls into one of three groups:
//! local validation, an application error reported by the service, or a
//! transport/parse failure.

use thiserror::Error;

/// Errors produced while talking to the FoodLens services
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Rejected locally before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// The service answered with an `error` field
    #[error("{0}")]
    Server(String),

    /// Connection refused, reset, DNS failure...
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timeout")]
    Timeout,

    /// Body was not JSON or did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// Server-reported application error, shown to the user verbatim
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server(message) => Some(message),
            _ => None,
        }
    }

    /// Transport, timeout or parse failure
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Timeout | ClientError::Parse(_)
        )
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::Parse(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
