use std::fmt;

use async_trait::async_trait;

use super::types::{ChatReply, ChatRequest};

/// Errors that can occur while talking to the chat backend.
///
/// The widget never shows these to the visitor; any variant becomes the
/// fallback reply.
#[derive(Debug)]
pub enum BackendError {
    /// Transport failure (DNS, connection refused, reset).
    Network(String),
    /// The backend answered with a non-success status.
    Api { status: u16, message: String },
    /// The body was not a valid chat reply.
    Parse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "backend error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// One request, one reply. No streaming, no retry.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns the name of the backend (for logs).
    fn name(&self) -> &str;

    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, BackendError>;
}
