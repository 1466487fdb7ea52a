//! Authentication error types.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed registration input (email shape, password length)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An account with this email is already registered
    #[error("An account already exists for {0}")]
    DuplicateAccount(String),

    /// No registered account matches this email
    #[error("No account found for {0}")]
    NotFound(String),

    /// The chooser surface could not be created (popup blocked)
    #[error("The sign-in window was blocked")]
    ChannelBlocked,

    /// The chooser surface was closed before an identity was chosen
    #[error("Sign-in was cancelled")]
    UserCancelled,

    /// The handshake exceeded its configured time limit
    #[error("Sign-in timed out")]
    HandshakeTimeout,

    /// Invalid state transition in the handshake FSM
    #[error("Invalid channel state transition: {0}")]
    InvalidStateTransition(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] auth_storage::StorageError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthError {
    /// Returns true for failures caused by the caller's input or the
    /// user's own action, whose messages are meant for direct display.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AuthError::Validation(_)
                | AuthError::DuplicateAccount(_)
                | AuthError::NotFound(_)
                | AuthError::ChannelBlocked
                | AuthError::UserCancelled
        )
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        assert!(AuthError::Validation("short password".to_string()).is_user_error());
        assert!(AuthError::DuplicateAccount("a@b.com".to_string()).is_user_error());
        assert!(AuthError::NotFound("a@b.com".to_string()).is_user_error());
        assert!(AuthError::ChannelBlocked.is_user_error());
        assert!(AuthError::UserCancelled.is_user_error());
    }

    #[test]
    fn test_system_errors() {
        assert!(!AuthError::InvalidStateTransition("bad".to_string()).is_user_error());
        assert!(!AuthError::Config("missing origin".to_string()).is_user_error());
        assert!(!AuthError::HandshakeTimeout.is_user_error());
    }

    #[test]
    fn test_messages_are_displayable() {
        let error = AuthError::DuplicateAccount("ana@x.com".to_string());
        assert_eq!(error.to_string(), "An account already exists for ana@x.com");

        let error = AuthError::UserCancelled;
        assert_eq!(error.to_string(), "Sign-in was cancelled");
    }
}
