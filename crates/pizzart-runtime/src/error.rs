#![forbid(unsafe_code)]

//! Errors crossing the collaborator seams.

/// Failure reported by an external collaborator (inventory, orders, status
/// feed). None of these are fatal: callers log them and degrade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// The collaborator could not be reached or timed out.
    #[error("service unavailable: {0}")]
    Unavailable(String),
    /// The collaborator refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),
    /// The referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl CollaboratorError {
    /// Stable short name for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Rejected(_) => "rejected",
            Self::NotFound(_) => "not_found",
        }
    }
}

/// Result alias for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;
