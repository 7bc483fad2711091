//! PixVault - Encryption Engine
//!
//! The single entry point the upload and decrypt paths go through. Owns
//! mode validation, the IV lifecycle, and the authenticate-before-decrypt
//! ordering. Every call is a stateless transformation of its arguments;
//! storage is somebody else's job.

use rand::RngCore;
use zeroize::Zeroizing;

use crate::crypto::auth::verify_password;
use crate::crypto::kdf::derive_cipher_key;
use crate::crypto::modes::{CipherMode, IV_LEN};
use crate::error::{VaultError, VaultResult};

/// Output of an encryption pass, ready for the caller to persist
#[derive(Debug, Clone)]
pub struct EncryptedImage {
    /// Fresh random IV, generated here
    pub iv: [u8; IV_LEN],
    /// Encrypted bytes
    pub ciphertext: Vec<u8>,
    /// The mode actually used, normalized
    pub mode: CipherMode,
}

/// True when `name` is one of the five supported modes, in any casing.
/// Upload handlers use this to reject bad input before doing any work.
pub fn is_valid_mode(name: &str) -> bool {
    CipherMode::parse(name).is_some()
}

/// Password-based image encryption engine.
///
/// Holds no state between calls; `encrypt` and `decrypt` may run fully in
/// parallel across requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncryptionEngine;

impl EncryptionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Encrypt plaintext bytes under the named mode.
    ///
    /// Generates a fresh 16-byte IV from the CSPRNG on every call, for
    /// every mode - ECB ignores it, but the record schema stores one
    /// uniformly. Returns IV, ciphertext and the normalized mode; never
    /// touches storage.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        password: &str,
        mode_name: &str,
    ) -> VaultResult<EncryptedImage> {
        if password.is_empty() {
            return Err(VaultError::Validation("password is required".into()));
        }

        let mode = CipherMode::parse(mode_name)
            .ok_or_else(|| VaultError::UnknownMode(mode_name.to_string()))?;

        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let key = derive_cipher_key(password)?;
        let ciphertext = mode.encrypt(plaintext, &key, &iv);

        log::debug!(
            "encrypted {} plaintext bytes to {} ciphertext bytes ({})",
            plaintext.len(),
            ciphertext.len(),
            mode
        );

        Ok(EncryptedImage {
            iv,
            ciphertext,
            mode,
        })
    }

    /// Authenticate, then decrypt.
    ///
    /// The credential check runs before any cipher work; on failure no key
    /// is derived and nothing is decrypted. On success the key is re-derived
    /// from the same password the upload path used, so no other secret is
    /// needed to invert the cipher.
    pub fn decrypt(
        &self,
        credential: &str,
        ciphertext: &[u8],
        iv: &[u8],
        mode_name: &str,
        password: &str,
    ) -> VaultResult<Vec<u8>> {
        if password.is_empty() {
            return Err(VaultError::Validation("password is required".into()));
        }

        let mode = CipherMode::parse(mode_name)
            .ok_or_else(|| VaultError::UnknownMode(mode_name.to_string()))?;

        let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| {
            VaultError::Validation(format!("iv must be {} bytes, got {}", IV_LEN, iv.len()))
        })?;

        if !verify_password(password, credential) {
            return Err(VaultError::Authentication);
        }

        let key: Zeroizing<[u8; 32]> = derive_cipher_key(password)?;
        mode.decrypt(ciphertext, &key, &iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::crypto::auth::hash_password;

    const PLAINTEXT: &[u8] = b"\xFF\xD8\xFF\xE0 not actually a JPEG but close enough";

    #[test]
    fn test_roundtrip_all_modes() {
        let engine = EncryptionEngine::new();
        let credential = hash_password("secret123").unwrap();

        for mode in CipherMode::ALL {
            let enc = engine.encrypt(PLAINTEXT, "secret123", mode.as_str()).unwrap();
            assert_eq!(enc.mode, mode);

            let decrypted = engine
                .decrypt(&credential, &enc.ciphertext, &enc.iv, mode.as_str(), "secret123")
                .unwrap();
            assert_eq!(decrypted.as_slice(), PLAINTEXT, "{mode}");
        }
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let engine = EncryptionEngine::new();

        let a = engine.encrypt(PLAINTEXT, "secret123", "CBC").unwrap();
        let b = engine.encrypt(PLAINTEXT, "secret123", "CBC").unwrap();

        assert_ne!(a.iv, b.iv);
        // Distinct IVs mean distinct ciphertext for the same input
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_mode_is_normalized() {
        let engine = EncryptionEngine::new();

        let enc = engine.encrypt(PLAINTEXT, "secret123", "cbc").unwrap();
        assert_eq!(enc.mode.as_str(), "CBC");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let engine = EncryptionEngine::new();

        let err = engine.encrypt(PLAINTEXT, "secret123", "rot13").unwrap_err();
        assert!(matches!(err, VaultError::UnknownMode(_)));
        assert!(!is_valid_mode("rot13"));
        assert!(is_valid_mode("cbc"));
    }

    #[test]
    fn test_empty_password_rejected() {
        let engine = EncryptionEngine::new();

        let err = engine.encrypt(PLAINTEXT, "", "CBC").unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));

        let err = engine.decrypt("whatever", &[0u8; 32], &[0u8; 16], "CBC", "").unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
    }

    #[test]
    fn test_wrong_password_is_authentication_error() {
        let engine = EncryptionEngine::new();
        let credential = hash_password("secret123").unwrap();

        let enc = engine.encrypt(PLAINTEXT, "secret123", "CBC").unwrap();
        let err = engine
            .decrypt(&credential, &enc.ciphertext, &enc.iv, "CBC", "wrong")
            .unwrap_err();
        assert!(matches!(err, VaultError::Authentication));
    }

    #[test]
    fn test_malformed_credential_is_authentication_error() {
        let engine = EncryptionEngine::new();

        let enc = engine.encrypt(PLAINTEXT, "secret123", "CTR").unwrap();
        let err = engine
            .decrypt("corrupted", &enc.ciphertext, &enc.iv, "CTR", "secret123")
            .unwrap_err();
        assert!(matches!(err, VaultError::Authentication));
    }

    #[test]
    fn test_bad_iv_length_rejected() {
        let engine = EncryptionEngine::new();
        let credential = hash_password("secret123").unwrap();

        let err = engine
            .decrypt(&credential, &[0u8; 32], &[0u8; 12], "CBC", "secret123")
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
    }

    #[test]
    fn test_corrupted_ciphertext_padded_mode() {
        let engine = EncryptionEngine::new();
        let credential = hash_password("secret123").unwrap();

        let mut enc = engine.encrypt(PLAINTEXT, "secret123", "CBC").unwrap();
        let last = enc.ciphertext.len() - 1;
        enc.ciphertext[last] ^= 0xFF;

        match engine.decrypt(&credential, &enc.ciphertext, &enc.iv, "CBC", "secret123") {
            Err(e) => assert!(matches!(e, VaultError::Decryption)),
            // Garbage can coincidentally unpad; the plaintext still never
            // comes back
            Ok(bytes) => assert_ne!(bytes.as_slice(), PLAINTEXT),
        }
    }

    #[test]
    fn test_concrete_cbc_scenario() {
        // 16 zero bytes under "secret123"/CBC: one data block plus one full
        // PKCS#7 padding block
        let engine = EncryptionEngine::new();
        let credential = hash_password("secret123").unwrap();
        let plaintext = [0u8; 16];

        let enc = engine.encrypt(&plaintext, "secret123", "CBC").unwrap();
        assert_eq!(enc.iv.len(), 16);
        assert_eq!(enc.ciphertext.len(), 32);
        assert_eq!(enc.mode, CipherMode::Cbc);

        let decrypted = engine
            .decrypt(&credential, &enc.ciphertext, &enc.iv, "CBC", "secret123")
            .unwrap();
        assert_eq!(decrypted, plaintext);
    }
}
