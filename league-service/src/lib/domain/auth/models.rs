use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::PhoneNumber;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Command to register a new account with validated profile fields.
///
/// The password is still plaintext here; the service applies the strength
/// policy and hashes it.
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub phone_number: PhoneNumber,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: String,
}

/// Login credentials as submitted.
///
/// The email is not validated as a format so a malformed address fails the
/// same way as an unknown one.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// An authenticated session: the user and its signed token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Stored password reset record.
///
/// Holds the SHA-256 digest of the token, never the token itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Whether the record may still authorize a password change at `now`.
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        !self.used && now <= self.expires_at
    }
}
