use chrono::DateTime;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;
use crate::password;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::role::Role;

/// Bytes drawn by the startup entropy self-check.
const SELF_CHECK_BYTES: usize = 32;

/// Authentication coordinator combining password verification and session tokens.
///
/// Holds the signing secret and the session lifetime, both fixed at
/// construction. Shared across requests behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    expiration_hours: i64,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,
    /// Claims embedded in the token
    pub claims: SessionClaims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Authenticator with the default Argon2id cost and password policy.
    ///
    /// Sessions issued by it live for `expiration_hours`.
    pub fn new(jwt_secret: &[u8], expiration_hours: i64) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            expiration_hours,
        }
    }

    /// Replace the password hasher (work factor and policy).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    /// Lifetime of issued sessions, in hours.
    pub fn session_lifetime_hours(&self) -> i64 {
        self.expiration_hours
    }

    /// Verify the OS random source is usable.
    ///
    /// Called once at startup; a failure here must stop the process.
    ///
    /// # Errors
    /// * `Entropy` - The OS random source is unavailable
    pub fn self_check(&self) -> Result<(), PasswordError> {
        password::generate_opaque_token(SELF_CHECK_BYTES).map(|_| ())
    }

    /// Check `password` against the policy and hash it with a fresh salt.
    ///
    /// # Errors
    /// * `WeakSecret` - Password does not meet the policy
    /// * `Entropy` - No salt could be drawn
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored PHC string.
    ///
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Spend one verification for a login attempt on an unknown account.
    pub fn verify_dummy_password(&self, password: &str) {
        self.password_hasher.verify_dummy(password)
    }

    /// Generate a hex-encoded random token of `byte_length` bytes.
    pub fn generate_opaque_token(&self, byte_length: usize) -> Result<String, PasswordError> {
        password::generate_opaque_token(byte_length)
    }

    /// Verify credentials and issue a session token carrying `role`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: impl ToString,
        email: &str,
        role: Role,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let claims =
            SessionClaims::for_user(user_id, email, role, Utc::now(), self.expiration_hours);
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Issue a session token without password verification.
    ///
    /// Used right after registration, when the password was just set.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue(
        &self,
        user_id: impl ToString,
        email: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        self.issue_at(user_id, email, role, Utc::now())
    }

    /// Issue a session token as of `issued_at`.
    pub fn issue_at(
        &self,
        user_id: impl ToString,
        email: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims =
            SessionClaims::for_user(user_id, email, role, issued_at, self.expiration_hours);
        self.jwt_handler.encode(&claims)
    }

    /// Validate a session token and return its claims unchanged.
    ///
    /// # Errors
    /// * `InvalidSignature` - MAC mismatch or unexpected algorithm
    /// * `Expired` - Token is past its expiration
    /// * `Malformed` - Token cannot be parsed
    pub fn validate(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.jwt_handler.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::password::HashingCost;
    use crate::password::PasswordPolicy;

    fn authenticator() -> Authenticator {
        let hasher = PasswordHasher::with_settings(
            HashingCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            PasswordPolicy::default(),
        )
        .expect("Failed to build hasher");

        Authenticator::new(b"test_secret_key_at_least_32_bytes!", 24).with_password_hasher(hasher)
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "Sup3rSecret!";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &hash, 42, "alice@example.com", Role::Normal)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let decoded = authenticator
            .validate(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded, result.claims);
        assert_eq!(decoded.sub, "42");
        assert_eq!(decoded.role, Role::Normal);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("Sup3rSecret!")
            .expect("Failed to hash password");

        let result = authenticator.authenticate(
            "wrong_password",
            &hash,
            42,
            "alice@example.com",
            Role::Admin,
        );
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let authenticator = authenticator();

        let token = authenticator
            .issue(7, "bob@example.com", Role::Admin)
            .expect("Failed to issue token");

        let claims = authenticator.validate(&token).expect("Failed to validate token");

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "bob@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_validate_token_past_expiry() {
        let authenticator = authenticator();

        let issued_at = Utc::now() - Duration::hours(25);
        let token = authenticator
            .issue_at(7, "bob@example.com", Role::Admin, issued_at)
            .unwrap();

        assert!(matches!(
            authenticator.validate(&token),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_validate_token_from_other_secret() {
        let authenticator = authenticator();
        let other = Authenticator::new(b"another_secret_key_at_least_32_bytes", 24);

        let token = other.issue(7, "bob@example.com", Role::Admin).unwrap();

        assert!(matches!(
            authenticator.validate(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator();

        let result = authenticator.validate("header.payload.signature");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_verify_password() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("Sup3rSecret!").unwrap();

        assert_eq!(authenticator.verify_password("Sup3rSecret!", &hash), Ok(true));
        assert_eq!(authenticator.verify_password("sup3rsecret!", &hash), Ok(false));
        assert!(authenticator
            .verify_password("Sup3rSecret!", "not-a-phc-string")
            .is_err());
    }

    #[test]
    fn test_self_check_passes() {
        assert!(authenticator().self_check().is_ok());
    }
}
