use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::NotificationError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::PasswordResetToken;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::Session;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;

/// Port for account authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account with role `normal` and open a session.
    ///
    /// # Errors
    /// * `WeakPassword` - Password does not meet the policy
    /// * `User(EmailAlreadyExists)` - Email is already registered
    /// * `DatabaseError` / `Internal` - Infrastructure failure
    async fn register(&self, command: RegisterCommand) -> Result<Session, AuthError>;

    /// Verify credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    async fn login(&self, command: LoginCommand) -> Result<Session, AuthError>;

    /// Resolve a session token to the current user record.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token invalid or expired, or the user no longer exists
    async fn verify_session(&self, token: &str) -> Result<User, AuthError>;

    /// Start a password reset.
    ///
    /// Succeeds identically whether or not the email is registered.
    ///
    /// # Errors
    /// * `Entropy` - Token could not be generated
    /// * `DatabaseError` - Reset record could not be stored
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Redeem a reset token and set a new password.
    ///
    /// # Errors
    /// * `InvalidOrExpiredResetToken` - Token unknown, used or expired (indistinguishable)
    /// * `WeakPassword` - New password does not meet the policy
    async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: String,
    ) -> Result<(), AuthError>;
}

/// Persistence operations for password reset records.
#[async_trait]
pub trait PasswordResetRepository: Send + Sync + 'static {
    /// Store a new reset record.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, token: &PasswordResetToken) -> Result<(), AuthError>;

    /// Retrieve a reset record by token digest.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<PasswordResetToken>, AuthError>;

    /// Atomically mark a record used if it is unused and unexpired at `now`.
    ///
    /// # Returns
    /// `true` when this call claimed the record, `false` when another
    /// caller already did or the record expired
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn mark_used(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, AuthError>;
}

/// Out-of-band delivery of reset tokens to their owner.
#[async_trait]
pub trait ResetTokenNotifier: Send + Sync + 'static {
    /// Deliver a reset token.
    ///
    /// # Errors
    /// * `DeliveryFailed` - Delivery channel rejected the message
    async fn send_reset_token(
        &self,
        user: &User,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), NotificationError>;
}
