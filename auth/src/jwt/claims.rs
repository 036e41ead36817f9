use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::role::Role;

/// Session token claims.
///
/// Identity, role and timing of a single login. Every field is required
/// when decoding, so a token missing any of them is rejected as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email address at issuance
    pub email: String,

    /// Role at issuance
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for a user session.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `email` - User email address
    /// * `role` - Role granted for this session
    /// * `issued_at` - Issuance instant, also used as not-before
    /// * `expiration_hours` - Hours until token expires
    ///
    /// # Returns
    /// Claims with sub, email, role, iat, nbf and exp set
    pub fn for_user(
        user_id: impl ToString,
        email: impl Into<String>,
        role: Role,
        issued_at: DateTime<Utc>,
        expiration_hours: i64,
    ) -> Self {
        let expiration = issued_at + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            email: email.into(),
            role,
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}
