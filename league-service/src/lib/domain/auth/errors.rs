use auth::PasswordError;
use thiserror::Error;

use crate::user::errors::UserError;

/// Error for reset token delivery
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to deliver notification: {0}")]
    DeliveryFailed(String),
}

/// Top-level error for authentication and password reset operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid or expired reset token")]
    InvalidOrExpiredResetToken,

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error(transparent)]
    User(#[from] UserError),

    // Infrastructure errors
    #[error("Secure random source unavailable: {0}")]
    Entropy(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::WeakSecret(reason) => AuthError::WeakPassword(reason),
            PasswordError::Entropy(msg) => AuthError::Entropy(msg),
            PasswordError::HashingFailed(_) | PasswordError::VerificationFailed(_) => {
                AuthError::Internal(err.to_string())
            }
        }
    }
}
