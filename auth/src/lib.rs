//! Authentication core library
//!
//! Provides the credential and session primitives used by the league service:
//! - Password hashing (Argon2id) behind a strength policy
//! - Opaque random tokens for password resets
//! - Session token (HS256 JWT) issuance and validation
//!
//! Persistence stays with the service: this crate never touches a database.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Authenticator, Role};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", 24);
//! let token = auth.issue(42, "alice@example.com", Role::Normal).unwrap();
//! let claims = auth.validate(&token).unwrap();
//! assert_eq!(claims.sub, "42");
//! assert_eq!(claims.role, Role::Normal);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Role};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", 24);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth
//!     .authenticate("password123", &hash, 42, "alice@example.com", Role::Normal)
//!     .unwrap();
//!
//! // Validate token
//! let claims = auth.validate(&result.access_token).unwrap();
//! assert_eq!(claims.email, "alice@example.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod role;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use password::digest_opaque_token;
pub use password::generate_opaque_token;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicy;
pub use role::Role;
pub use role::UnknownRoleError;
