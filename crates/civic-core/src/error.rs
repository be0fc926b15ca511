//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Client error: {0}")]
    Client(#[from] civic_client::ClientError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report not loaded")]
    ReportNotLoaded,

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl CoreError {
    /// True when the error came from a fetch superseded by a newer one
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::Client(e) if e.is_cancelled())
    }
}
