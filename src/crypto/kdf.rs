//! PixVault - Cipher Key Derivation
//!
//! Deterministically maps a password to the AES-256 key. Decryption has no
//! stored secret other than the record itself, so the same password must
//! reproduce byte-identical key material on every call, on every process.
//! That rules out the salted credential hash as a key source; this module
//! is the second, independent derivation of the raw password.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use crate::crypto::modes::KEY_LEN;
use crate::error::{VaultError, VaultResult};

/// Application-wide KDF salt. Fixed on purpose: the record schema reserves
/// no slot for a per-record KDF salt, and the key must be re-derivable from
/// the password alone.
const KDF_SALT: &[u8] = b"PIXVAULT_CIPHER_KEY_v1";

/// Argon2id cost parameters (memory KiB, passes, lanes)
const KDF_MEMORY_KIB: u32 = 65536;
const KDF_TIME_COST: u32 = 3;
const KDF_LANES: u32 = 4;

/// Derive the 256-bit cipher key from a password.
///
/// Byte-identical output for the same password, across calls and restarts.
/// Does not fail for any non-empty password; the empty-password rejection
/// belongs to the engine boundary, not here.
pub fn derive_cipher_key(password: &str) -> VaultResult<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(KDF_MEMORY_KIB, KDF_TIME_COST, KDF_LANES, Some(KEY_LEN))
        .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), KDF_SALT, &mut *key)
        .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let k1 = derive_cipher_key("secret123").unwrap();
        let k2 = derive_cipher_key("secret123").unwrap();
        assert_eq!(*k1, *k2);
    }

    #[test]
    fn test_different_passwords_different_keys() {
        let k1 = derive_cipher_key("secret123").unwrap();
        let k2 = derive_cipher_key("secret124").unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn test_key_length() {
        let key = derive_cipher_key("x").unwrap();
        assert_eq!(key.len(), 32);
    }
}
