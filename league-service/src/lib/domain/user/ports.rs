use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Admin-facing user management. Every call behind it is gated on the admin role.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// # Errors
    /// `NotFound` when no account has this id.
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// All accounts, most recently created first.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Apply the fields present in `command`; absent fields keep their value.
    ///
    /// A role change is stored immediately but only reaches the session
    /// token at the account's next login.
    ///
    /// # Errors
    /// * `NotFound` - no account has this id
    /// * `EmailAlreadyExists` - the new email belongs to another account
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Storage for accounts. Email uniqueness is enforced here, not by callers.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert an account; storage assigns the id and timestamps.
    ///
    /// # Errors
    /// `EmailAlreadyExists` on a duplicate email.
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Newest first.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Overwrite the profile and role of an existing account.
    ///
    /// # Errors
    /// * `NotFound` - the row is gone
    /// * `EmailAlreadyExists` - the new email belongs to another account
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Only the hash changes; `updated_at` is bumped alongside it.
    async fn update_password_hash(&self, id: &UserId, password_hash: &str)
        -> Result<(), UserError>;

    /// # Errors
    /// `NotFound` when nothing was deleted.
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
