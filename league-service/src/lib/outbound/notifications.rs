use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::NotificationError;
use crate::domain::auth::ports::ResetTokenNotifier;
use crate::domain::user::models::User;

/// Notifier that records that a reset token was issued.
///
/// Stands in until a mail transport is wired up. The token itself is never
/// written to the log.
#[derive(Debug, Default, Clone)]
pub struct LoggingResetTokenNotifier;

impl LoggingResetTokenNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResetTokenNotifier for LoggingResetTokenNotifier {
    async fn send_reset_token(
        &self,
        user: &User,
        _token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            user_id = %user.id,
            expires_at = %expires_at,
            "Password reset token issued"
        );
        Ok(())
    }
}
