//! Error type for the lifecycle service

use thiserror::Error;

use super::stores::StoreError;
use crate::domain::{ContentError, JottId};

/// Every failure a core operation can return
///
/// Errors are detected before any persistence side effect where possible;
/// collaborator failures are surfaced as [`CoreError::Store`] without retry.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Jott not found: {0}")]
    NotFound(JottId),

    #[error("Jott {0} belongs to another user")]
    Forbidden(JottId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Monthly jott limit reached ({used}/{limit})")]
    QuotaExceeded { used: u32, limit: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Stable machine-readable kind, used by the JSON output format
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Unauthenticated => "unauthenticated",
            CoreError::NotFound(_) => "not_found",
            CoreError::Forbidden(_) => "forbidden",
            CoreError::InvalidInput(_) => "invalid_input",
            CoreError::Content(ContentError::MalformedSyntax(_)) => "malformed_syntax",
            CoreError::Content(ContentError::InvalidShape) => "invalid_shape",
            CoreError::QuotaExceeded { .. } => "quota_exceeded",
            CoreError::Store(_) => "store_unavailable",
        }
    }
}
