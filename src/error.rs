//! Error types for the membership core.

use crate::types::MemberId;
use thiserror::Error;

/// Main error type for core operations.
///
/// Outcomes a caller is expected to handle as ordinary results (an
/// already-admitted participant, a cancel for someone who is not booked)
/// are modelled as result enums and never show up here.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session already exists: {0}")]
    SessionExists(String),

    #[error("Member already has a subscription: {0}")]
    DuplicateMember(MemberId),

    #[error("Unknown plan duration: {0}")]
    UnknownDuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
