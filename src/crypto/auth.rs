//! PixVault - Password Authentication
//!
//! Salted, adaptive-cost credential hashing. The credential gates access to
//! decryption and is never usable as key material: its salt is random per
//! record, so its output is different on every hash call even for the same
//! password. The reproducible cipher key lives in [`crate::crypto::kdf`].

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{VaultError, VaultResult};

/// Hash a password into a PHC-format Argon2id credential with a fresh
/// random salt. Called once per upload, before the record is persisted.
pub fn hash_password(password: &str) -> VaultResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| VaultError::CredentialHash(e.to_string()))
}

/// Verify a password against a stored credential.
///
/// A malformed credential is a mismatch, not an error: decryption must not
/// crash because a stored record rotted.
pub fn verify_password(password: &str, credential: &str) -> bool {
    match PasswordHash::new(credential) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let credential = hash_password("secret123").unwrap();

        assert!(verify_password("secret123", &credential));
        assert!(!verify_password("secret124", &credential));
        assert!(!verify_password("", &credential));
    }

    #[test]
    fn test_salted_hash_is_not_deterministic() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();

        // Fresh salt per call - both verify, neither repeats
        assert_ne!(a, b);
        assert!(verify_password("secret123", &a));
        assert!(verify_password("secret123", &b));
    }

    #[test]
    fn test_malformed_credential_is_mismatch() {
        assert!(!verify_password("secret123", ""));
        assert!(!verify_password("secret123", "not-a-phc-string"));
        assert!(!verify_password("secret123", "$argon2id$v=19$garbage"));
    }
}
