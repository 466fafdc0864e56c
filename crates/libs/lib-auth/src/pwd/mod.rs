//! # Password Hashing
//!
//! Password hashing and verification using Argon2.

use crate::error::{Error, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with Argon2 and a fresh random salt.
///
/// Returns the PHC string form, which embeds the salt and parameters.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Hash(e.to_string()))
}

/// Verify a plaintext password against a stored Argon2 hash.
///
/// `Ok(false)` means the password does not match. An error means the stored
/// hash could not be parsed at all.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::MalformedHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "hunter2";
        let hash = hash_password(password).expect("Password hashing should succeed");

        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).expect("Hash should parse"));
        assert!(!verify_password("hunter3", &hash).expect("Hash should parse"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("same-password").expect("Hashing should succeed");
        let second = hash_password("same-password").expect("Hashing should succeed");

        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = verify_password("anything", "not-a-phc-string");

        assert!(matches!(result, Err(Error::MalformedHash(_))));
    }

    #[test]
    fn test_bcrypt_hash_never_verifies() {
        // bcrypt of "password", cost 10
        let bcrypt = "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

        let result = verify_password("password", bcrypt);

        assert!(!matches!(result, Ok(true)));
    }
}
