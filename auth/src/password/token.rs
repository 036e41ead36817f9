use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use sha2::Digest;
use sha2::Sha256;

use super::errors::PasswordError;

/// Generate an opaque random token.
///
/// Draws `byte_length` bytes from the operating system CSPRNG and
/// hex-encodes them, so the returned string is `2 * byte_length` long.
/// There is no fallback source: if the OS generator fails the call fails.
///
/// # Errors
/// * `Entropy` - The OS random source is unavailable
pub fn generate_opaque_token(byte_length: usize) -> Result<String, PasswordError> {
    let mut bytes = vec![0u8; byte_length];

    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| PasswordError::Entropy(e.to_string()))?;

    Ok(hex::encode(bytes))
}

/// SHA-256 digest of an opaque token, hex-encoded.
///
/// Stored in place of the token itself and used as the lookup key.
pub fn digest_opaque_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_hex_of_requested_length() {
        let token = generate_opaque_token(32).expect("Failed to generate token");
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let first = generate_opaque_token(32).unwrap();
        let second = generate_opaque_token(32).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_digest_is_stable_and_differs_from_token() {
        let token = generate_opaque_token(32).unwrap();
        let digest = digest_opaque_token(&token);

        assert_eq!(digest, digest_opaque_token(&token));
        assert_ne!(digest, token);
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_digest_known_value() {
        assert_eq!(
            digest_opaque_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
