use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;
use super::policy::PasswordPolicy;

/// Salt and output of a hash that no password maps to.
///
/// Only used to spend one verification when there is no stored hash.
const DUMMY_SALT: &str = "WMBym1ifsoSnWxnBOLFznA";
const DUMMY_OUTPUT: &str = "blKJ0n2xxM1QPwEmGqxyqRJP+eeOfjrGQ2roItVo7TU";

const SALT_LENGTH: usize = 16;

/// Argon2id work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl HashingCost {
    /// 64 MiB
    pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
    pub const DEFAULT_ITERATIONS: u32 = 3;
    pub const DEFAULT_PARALLELISM: u32 = 1;

    fn params(&self) -> Result<Params, PasswordError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordError::HashingFailed(format!("Invalid hashing cost: {}", e)))
    }
}

/// A few hundred milliseconds per hash on server hardware in a release build.
impl Default for HashingCost {
    fn default() -> Self {
        Self {
            memory_kib: Self::DEFAULT_MEMORY_KIB,
            iterations: Self::DEFAULT_ITERATIONS,
            parallelism: Self::DEFAULT_PARALLELISM,
        }
    }
}

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id)
/// behind a strength policy.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        let cost = HashingCost::default();
        // The default cost is within Argon2's accepted ranges
        let params = cost.params().unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            policy: PasswordPolicy::default(),
            dummy_hash: dummy_hash(&cost),
        }
    }

    /// Create a password hasher with an explicit work factor and policy.
    ///
    /// # Arguments
    /// * `cost` - Argon2id memory, iteration and parallelism parameters
    /// * `policy` - Strength policy applied before hashing
    ///
    /// # Errors
    /// * `HashingFailed` - Parameters are outside what Argon2 accepts
    pub fn with_settings(cost: HashingCost, policy: PasswordPolicy) -> Result<Self, PasswordError> {
        let params = cost.params()?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            policy,
            dummy_hash: dummy_hash(&cost),
        })
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `WeakSecret` - Password does not satisfy the policy
    /// * `Entropy` - Salt could not be drawn from the OS random source
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        self.policy.check(password)?;

        let mut salt_bytes = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| PasswordError::Entropy(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Spend one verification at the configured cost without a stored hash.
    ///
    /// Keeps the "unknown account" path as slow as a wrong password.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash);
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn dummy_hash(cost: &HashingCost) -> String {
    format!(
        "$argon2id$v=19$m={},t={},p={}${}${}",
        cost.memory_kib, cost.iterations, cost.parallelism, DUMMY_SALT, DUMMY_OUTPUT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::with_settings(
            HashingCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            PasswordPolicy::default(),
        )
        .expect("Failed to build hasher")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        // Hash the password
        let hash = hasher.hash(password).expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$v=19$m=65536,t=3,p=1$"));

        // Verify correct password
        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        // Verify incorrect password
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = cheap_hasher();

        let first = hasher.hash("Sup3rSecret!").unwrap();
        let second = hasher.hash("Sup3rSecret!").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("Sup3rSecret!", &first).unwrap());
        assert!(hasher.verify("Sup3rSecret!", &second).unwrap());
    }

    #[test]
    fn test_hash_records_configured_cost() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("Sup3rSecret!").unwrap();
        assert!(hash.contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_hash_rejects_weak_password() {
        let hasher = cheap_hasher();
        assert!(matches!(
            hasher.hash("short"),
            Err(PasswordError::WeakSecret(_))
        ));
        assert!(matches!(hasher.hash(""), Err(PasswordError::WeakSecret(_))));
    }

    #[test]
    fn test_invalid_cost_is_rejected() {
        let result = PasswordHasher::with_settings(
            HashingCost {
                memory_kib: 1,
                iterations: 0,
                parallelism: 1,
            },
            PasswordPolicy::default(),
        );
        assert!(matches!(result, Err(PasswordError::HashingFailed(_))));
    }

    /// Run with `cargo test --release -p auth -- --ignored --nocapture`
    #[test]
    #[ignore = "timing check, meaningful only in release builds"]
    fn test_default_cost_is_deliberately_slow() {
        let hasher = PasswordHasher::new();
        let runs: u32 = 5;

        let started = std::time::Instant::now();
        for _ in 0..runs {
            hasher.hash("Sup3rSecret!").expect("Failed to hash password");
        }
        let per_call = started.elapsed() / runs;

        println!("default Argon2id cost: {:?} per hash", per_call);
        assert!(per_call >= std::time::Duration::from_millis(50));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_dummy_hash_is_well_formed_and_never_matches() {
        let hasher = cheap_hasher();
        assert!(!hasher
            .verify("Sup3rSecret!", &hasher.dummy_hash)
            .expect("Dummy hash must parse"));
        hasher.verify_dummy("Sup3rSecret!");
    }
}
