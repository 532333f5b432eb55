use crate::models::ErrorBody;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a call to the credit API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("Credito API returned {status}{}", message_suffix(.body))]
    Http {
        status: StatusCode,
        /// Decoded error payload, if the backend sent a JSON one.
        body: Option<ErrorBody>,
    },
    /// The request never produced a response (connect, timeout, ...).
    #[error("Credito API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A 2xx response whose body did not match the expected shape.
    #[error("Failed to parse Credito API response: {0}")]
    Decode(String),
    /// The lookup code could not be turned into a request URL.
    #[error("Failed to build URL: {0}")]
    InvalidUrl(String),
}

fn message_suffix(body: &Option<ErrorBody>) -> String {
    body.as_ref()
        .and_then(|b| b.message.as_deref())
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ClientError {
    /// Message supplied by the backend, if there is a non-blank one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Http {
                body: Some(body), ..
            } => body.message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
