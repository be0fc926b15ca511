//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Request rejected ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected status: {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Request superseded")]
    Cancelled,
}

/// Coarse classification for callers deciding how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failed; nothing was received
    Network,
    /// Credentials missing, expired or insufficient
    Auth,
    /// Backend rejected the request (4xx)
    Client,
    /// Backend failed or answered garbage (5xx, undecodable body)
    Server,
    /// Never left the process
    Local,
}

impl ClientError {
    /// Map a non-success status and its message onto the taxonomy
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ClientError::Unauthorized { message },
            403 => ClientError::Forbidden { message },
            404 => ClientError::NotFound { message },
            400..=499 => ClientError::Client { status, message },
            500..=599 => ClientError::Server { status, message },
            _ => ClientError::UnexpectedStatus { status },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Unauthorized { .. } | ClientError::Forbidden { .. } => ErrorKind::Auth,
            ClientError::NotFound { .. } | ClientError::Client { .. } => ErrorKind::Client,
            ClientError::Server { .. }
            | ClientError::UnexpectedStatus { .. }
            | ClientError::Decode(_) => ErrorKind::Server,
            ClientError::Serialization(_)
            | ClientError::InvalidUrl(_)
            | ClientError::Validation(_)
            | ClientError::PermissionDenied(_)
            | ClientError::Cancelled => ErrorKind::Local,
        }
    }

    /// HTTP status behind this error, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::NotFound { .. } => Some(404),
            ClientError::Client { status, .. }
            | ClientError::Server { status, .. }
            | ClientError::UnexpectedStatus { status } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ClientError::from_status(401, "expired".into()),
            ClientError::Unauthorized { .. }
        ));
        assert!(matches!(
            ClientError::from_status(422, "bad".into()),
            ClientError::Client { status: 422, .. }
        ));
        assert!(matches!(
            ClientError::from_status(503, "down".into()),
            ClientError::Server { status: 503, .. }
        ));
        assert!(matches!(
            ClientError::from_status(302, String::new()),
            ClientError::UnexpectedStatus { status: 302 }
        ));
    }

    #[test]
    fn test_kind() {
        assert_eq!(ClientError::from_status(403, "no".into()).kind(), ErrorKind::Auth);
        assert_eq!(ClientError::from_status(404, "gone".into()).kind(), ErrorKind::Client);
        assert_eq!(ClientError::from_status(500, "boom".into()).kind(), ErrorKind::Server);
        assert_eq!(ClientError::Cancelled.kind(), ErrorKind::Local);
        assert_eq!(ClientError::Decode("eof".into()).kind(), ErrorKind::Server);
    }

    #[test]
    fn test_message_is_displayed() {
        let err = ClientError::from_status(400, "Title is required".into());
        assert_eq!(err.to_string(), "Request rejected (400): Title is required");
        assert_eq!(err.status(), Some(400));
    }
}
