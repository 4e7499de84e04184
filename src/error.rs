use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// A single HTTP exchange that failed at the network layer or came back with
/// a non-success status (other than 404, which callers receive as data).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    StatusError { url: String, status: StatusCode },
}

#[derive(Error, Debug)]
pub enum JenkinsError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to connect to Jenkins: {0}")]
    ConnectionError(#[source] TransportError),

    #[error("Failed to {action}: {source}")]
    RequestError {
        action: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("Protocol violation: {0}")]
    ProtocolError(String),

    #[error("Build was cancelled (queue item {queue_url})")]
    CancelledError { queue_url: String },

    #[error("Timed out after {waited:?} waiting on {url}")]
    TimeoutError { url: String, waited: Duration },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl JenkinsError {
    pub fn request(action: &'static str) -> impl FnOnce(TransportError) -> Self {
        move |source| Self::RequestError { action, source }
    }

    /// Whether re-issuing the whole operation could plausibly succeed.
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(TransportError::NetworkError(_))
            | Self::RequestError {
                source: TransportError::NetworkError(_),
                ..
            } => true,
            Self::ConnectionError(TransportError::StatusError { status, .. })
            | Self::RequestError {
                source: TransportError::StatusError { status, .. },
                ..
            } => status.is_server_error(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, JenkinsError>;
