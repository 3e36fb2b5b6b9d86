//! Error types for the contributors loader.

use thiserror::Error;

/// Main error type for the contributors loader.
#[derive(Error, Debug)]
pub enum Error {
    /// Retrieval of repositories or contributors failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The owning scope was cancelled before the load finished
    #[error("Load cancelled")]
    Cancelled,

    /// A spawned worker panicked or was torn down unexpectedly
    #[error("Worker error: {0}")]
    Worker(String),

    /// HTTP client construction error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The fan-in channel lost all producers before the expected items arrived
    #[error("Channel closed after {received} of {expected} items")]
    ChannelClosed { received: usize, expected: usize },
}

impl Error {
    /// Check whether this is the cancellation early-exit rather than a failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Get the underlying service error, if any.
    #[must_use]
    pub fn as_service(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Worker(err.to_string())
        }
    }
}

/// Failures reported by the remote service.
///
/// Each variant corresponds to a category of HTTP outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Raised when the organization or repository does not exist (404).
    #[error("[{status}] {message}")]
    NotFound {
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    /// Raised when the API quota is exhausted (403/429 with no remaining quota).
    #[error("[{status}] {message}")]
    RateLimited {
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    /// Raised on server errors (5xx).
    #[error("[{status}] {message}")]
    Server {
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    /// Raised on any other non-success status.
    #[error("[{status}] {message}")]
    Status {
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Get the HTTP status, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { status, .. }
            | Self::RateLimited { status, .. }
            | Self::Server { status, .. }
            | Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Get the request ID if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::NotFound { request_id, .. }
            | Self::RateLimited { request_id, .. }
            | Self::Server { request_id, .. }
            | Self::Status { request_id, .. } => request_id.as_deref(),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_accessors() {
        let error = ServiceError::NotFound {
            status: 404,
            message: "Not Found".to_string(),
            request_id: Some("C0DE:1234".to_string()),
        };

        assert_eq!(error.status(), Some(404));
        assert_eq!(error.request_id(), Some("C0DE:1234"));
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "[404] Not Found");
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let error = ServiceError::Transport("connection reset".to_string());
        assert_eq!(error.status(), None);
        assert_eq!(error.request_id(), None);
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_service_error_converts_into_error() {
        let error: Error = ServiceError::Decode("unexpected EOF".to_string()).into();
        assert!(!error.is_cancelled());
        assert_eq!(
            error.as_service(),
            Some(&ServiceError::Decode("unexpected EOF".to_string()))
        );
    }

    #[test]
    fn test_cancelled() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(Error::Cancelled.as_service().is_none());
    }
}
