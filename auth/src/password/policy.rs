use super::errors::PasswordError;

/// Password strength policy applied before hashing.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl PasswordPolicy {
    pub const DEFAULT_MIN_LENGTH: usize = 8;
    pub const DEFAULT_MAX_LENGTH: usize = 128;

    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// Check a plaintext password against the policy.
    ///
    /// # Errors
    /// * `WeakSecret` - Password is empty, too short or too long
    pub fn check(&self, password: &str) -> Result<(), PasswordError> {
        let length = password.chars().count();

        if password.trim().is_empty() {
            return Err(PasswordError::WeakSecret(
                "password must not be empty".to_string(),
            ));
        }

        if length < self.min_length {
            return Err(PasswordError::WeakSecret(format!(
                "password must be at least {} characters",
                self.min_length
            )));
        }

        if length > self.max_length {
            return Err(PasswordError::WeakSecret(format!(
                "password must be at most {} characters",
                self.max_length
            )));
        }

        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LENGTH, Self::DEFAULT_MAX_LENGTH)
    }
}
