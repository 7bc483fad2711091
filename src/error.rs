//! PixVault - Error Types

use thiserror::Error;

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    // ═══════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("{0}")]
    Validation(String),

    #[error("invalid mode: {0} (use ECB, CBC, CFB, OFB, or CTR)")]
    UnknownMode(String),

    // ═══════════════════════════════════════════════════════════════
    // AUTH / CRYPTO ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("invalid password")]
    Authentication,

    #[error("decryption failed")]
    Decryption,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("credential hashing failed: {0}")]
    CredentialHash(String),

    // ═══════════════════════════════════════════════════════════════
    // STORE ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("image not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("stored record corrupted: {0}")]
    Corrupted(String),

    // ═══════════════════════════════════════════════════════════════
    // IO
    // ═══════════════════════════════════════════════════════════════

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// True for errors the caller can fix by correcting the request
    pub fn is_validation(&self) -> bool {
        matches!(self, VaultError::Validation(_) | VaultError::UnknownMode(_))
    }

    /// True when the operation failed because the password could not be
    /// proven correct, either at the credential check or at padding
    /// validation. The two stages must not be distinguishable to callers.
    pub fn is_password_failure(&self) -> bool {
        matches!(self, VaultError::Authentication | VaultError::Decryption)
    }

    /// Message safe to show outside the vault boundary. Authentication and
    /// decryption failures collapse to one string so the outer surface
    /// cannot be used as an oracle for which check failed.
    pub fn public_message(&self) -> String {
        if self.is_password_failure() {
            "invalid password or corrupted image data".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(e: rusqlite::Error) -> Self {
        VaultError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_failures_share_public_message() {
        let auth = VaultError::Authentication;
        let dec = VaultError::Decryption;

        assert_eq!(auth.public_message(), dec.public_message());
        // Internal representations stay distinct
        assert_ne!(auth.to_string(), dec.to_string());
    }

    #[test]
    fn test_validation_keeps_specific_message() {
        let err = VaultError::UnknownMode("ROT13".into());
        assert!(err.public_message().contains("ROT13"));
        assert!(err.is_validation());
    }
}
