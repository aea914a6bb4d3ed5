//! Error types for TutorGuard

use crate::records::ApplicationStatus;

/// Result type alias using TutorGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for TutorGuard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rule table compilation errors
    #[error("policy error: {0}")]
    Policy(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage collaborator failures
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Review requested from a status that cannot be reviewed
    #[error("cannot move application from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
}

impl Error {
    /// Create a new policy error
    pub fn policy(msg: impl Into<String>) -> Self {
        Self::Policy(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failures reported by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = Error::InvalidTransition {
            from: ApplicationStatus::Pending,
            to: ApplicationStatus::Approved,
        };
        assert_eq!(err.to_string(), "cannot move application from pending to approved");
    }

    #[test]
    fn test_store_error_converts() {
        let err: Error = StoreError::NotFound("app_1".to_string()).into();
        assert!(matches!(err, Error::Store(StoreError::NotFound(_))));
    }
}
