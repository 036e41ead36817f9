use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Role;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::PasswordResetToken;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::Session;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::PasswordResetRepository;
use crate::domain::auth::ports::ResetTokenNotifier;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Reset tokens carry 256 bits of entropy.
const RESET_TOKEN_BYTES: usize = 32;

/// Domain service for registration, login, session verification and
/// password resets.
///
/// Password hashing and verification run on the blocking pool.
pub struct AuthService<UR, PR, N>
where
    UR: UserRepository,
    PR: PasswordResetRepository,
    N: ResetTokenNotifier,
{
    users: Arc<UR>,
    reset_tokens: Arc<PR>,
    notifier: Arc<N>,
    authenticator: Arc<Authenticator>,
    reset_token_ttl: Duration,
}

impl<UR, PR, N> AuthService<UR, PR, N>
where
    UR: UserRepository,
    PR: PasswordResetRepository,
    N: ResetTokenNotifier,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `reset_tokens` - Reset record persistence implementation
    /// * `notifier` - Out-of-band reset token delivery
    /// * `authenticator` - Credential and session token primitives
    /// * `reset_token_ttl` - Lifetime of a reset token
    pub fn new(
        users: Arc<UR>,
        reset_tokens: Arc<PR>,
        notifier: Arc<N>,
        authenticator: Arc<Authenticator>,
        reset_token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            reset_tokens,
            notifier,
            authenticator,
            reset_token_ttl,
        }
    }

    async fn run_blocking<T, F>(&self, task: F) -> Result<T, AuthError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || task(&authenticator))
            .await
            .map_err(|e| AuthError::Internal(format!("Credential task failed: {}", e)))
    }

    fn issue_session(&self, user: User) -> Result<Session, AuthError> {
        let token = self
            .authenticator
            .issue(user.id, user.email.as_str(), user.role)
            .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(Session { user, token })
    }
}

#[async_trait]
impl<UR, PR, N> AuthServicePort for AuthService<UR, PR, N>
where
    UR: UserRepository,
    PR: PasswordResetRepository,
    N: ResetTokenNotifier,
{
    async fn register(&self, command: RegisterCommand) -> Result<Session, AuthError> {
        if self.users.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()).into());
        }

        let password = command.password;
        let password_hash = self
            .run_blocking(move |authenticator| authenticator.hash_password(&password))
            .await??;

        let user = self
            .users
            .create(NewUser {
                email: command.email,
                phone_number: command.phone_number,
                first_name: command.first_name,
                last_name: command.last_name,
                role: Role::Normal,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        self.issue_session(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, AuthError> {
        let user = match EmailAddress::new(command.email) {
            Ok(email) => self.users.find_by_email(&email).await?,
            Err(_) => None,
        };

        let password = command.password;

        let Some(user) = user else {
            self.run_blocking(move |authenticator| authenticator.verify_dummy_password(&password))
                .await?;
            tracing::info!(outcome = "unknown_account", "Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let user_id = user.id;
        let email = user.email.to_string();
        let role = user.role;
        let stored_hash = user.password_hash.clone();

        let result = self
            .run_blocking(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, user_id, &email, role)
            })
            .await?;

        match result {
            Ok(authenticated) => {
                tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded");
                Ok(Session {
                    user,
                    token: authenticated.access_token,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::info!(user_id = %user.id, outcome = "wrong_password", "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash unusable");
                Err(AuthError::Internal(e.to_string()))
            }
            Err(AuthenticationError::JwtError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Token generation failed");
                Err(AuthError::Internal(e.to_string()))
            }
        }
    }

    async fn verify_session(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.authenticator.validate(token).map_err(|e| {
            tracing::debug!(reason = %e, "Session token rejected");
            AuthError::Unauthenticated
        })?;

        let user_id = UserId::from_string(&claims.sub).map_err(|_| AuthError::Unauthenticated)?;

        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError> {
        // Generated on both paths so an unknown email does the same work
        let token = self.authenticator.generate_opaque_token(RESET_TOKEN_BYTES)?;

        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::info!(outcome = "unknown_account", "Password reset requested");
            return Ok(());
        };

        let now = Utc::now();
        let record = PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: user.id,
            token_hash: auth::digest_opaque_token(&token),
            expires_at: now + self.reset_token_ttl,
            used: false,
            created_at: now,
        };

        self.reset_tokens.create(&record).await?;

        if let Err(e) = self
            .notifier
            .send_reset_token(&user, &token, record.expires_at)
            .await
        {
            tracing::error!(
                user_id = %user.id,
                error = %e,
                "Failed to deliver password reset token"
            );
        }

        tracing::info!(
            user_id = %user.id,
            expires_at = %record.expires_at,
            "Password reset requested"
        );

        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: String,
    ) -> Result<(), AuthError> {
        let token_hash = auth::digest_opaque_token(token);

        let record = self
            .reset_tokens
            .find_by_token_hash(&token_hash)
            .await?
            .filter(|record| record.is_redeemable(Utc::now()))
            .ok_or(AuthError::InvalidOrExpiredResetToken)?;

        // Hash before claiming so a rejected password leaves the token usable
        let password_hash = self
            .run_blocking(move |authenticator| authenticator.hash_password(&new_password))
            .await??;

        if !self.reset_tokens.mark_used(&token_hash, Utc::now()).await? {
            tracing::warn!(user_id = %record.user_id, "Reset token already claimed");
            return Err(AuthError::InvalidOrExpiredResetToken);
        }

        if let Err(e) = self
            .users
            .update_password_hash(&record.user_id, &password_hash)
            .await
        {
            tracing::error!(
                user_id = %record.user_id,
                error = %e,
                "Password update failed after reset token was consumed"
            );
            return Err(e.into());
        }

        tracing::info!(user_id = %record.user_id, "Password reset completed");

        Ok(())
    }
}
