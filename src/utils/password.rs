//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings so the salt and parameters travel with
//! the hash.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::AppResult;

/// Hash a password using Argon2id with a random salt.
///
/// # Example
/// ```ignore
/// let hashed = hash_password("my_secure_password")?;
/// ```
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// The comparison happens inside the Argon2 verifier and is constant-time.
/// A stored value that does not parse as a PHC string never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed_hash = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password is not a valid PHC hash");
            return Ok(false);
        }
    };

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// True when `value` looks like an Argon2 PHC string.
pub fn is_password_hash(value: &str) -> bool {
    PasswordHash::new(value).is_ok_and(|hash| hash.algorithm.as_str().starts_with("argon2"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_argon2id_phc() {
        let hash = hash_password("secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(is_password_hash(&hash));
        assert!(!hash.contains("secret"));
    }

    #[test]
    fn test_salts_differ() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_round_trip() {
        let hash = hash_password("secret").unwrap();
        assert!(verify_password("secret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_plaintext_stored_value_never_matches() {
        assert!(!verify_password("secret", "secret").unwrap());
        assert!(!is_password_hash("secret"));
    }

    #[test]
    fn test_empty_password_still_hashes() {
        let hash = hash_password("").unwrap();
        assert!(verify_password("", &hash).unwrap());
    }
}
