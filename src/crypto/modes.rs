//! PixVault - Cipher Mode Strategies
//!
//! One strategy per AES-256 mode of operation. ECB and CBC carry PKCS#7
//! padding; CFB, OFB and CTR are length-preserving stream modes. Every
//! variant takes the same (key, iv) arguments so the engine can treat them
//! uniformly; ECB simply ignores its IV.

use std::fmt;
use std::str::FromStr;

use aes::cipher::{
    block_padding::Pkcs7, AsyncStreamCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
    StreamCipher,
};
use aes::Aes256;
use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// AES block / IV length in bytes
pub const IV_LEN: usize = 16;

type EcbEnc = ecb::Encryptor<Aes256>;
type EcbDec = ecb::Decryptor<Aes256>;
type CbcEnc = cbc::Encryptor<Aes256>;
type CbcDec = cbc::Decryptor<Aes256>;
type CfbEnc = cfb_mode::Encryptor<Aes256>;
type CfbDec = cfb_mode::Decryptor<Aes256>;
type OfbStream = ofb::Ofb<Aes256>;
type CtrStream = ctr::Ctr128BE<Aes256>;

/// The closed set of supported modes of operation.
///
/// Dispatch is always an exhaustive `match` on this enum; adding or removing
/// a mode is a compile-checked change, never a scattered string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CipherMode {
    /// Electronic codebook. Identical plaintext blocks produce identical
    /// ciphertext blocks; kept for demonstration of exactly that weakness.
    Ecb,
    /// Cipher block chaining
    Cbc,
    /// Cipher feedback, full-block (CFB-128)
    Cfb,
    /// Output feedback
    Ofb,
    /// Counter mode, big-endian full-block counter
    Ctr,
}

impl CipherMode {
    /// All supported modes, in canonical order
    pub const ALL: [CipherMode; 5] = [
        CipherMode::Ecb,
        CipherMode::Cbc,
        CipherMode::Cfb,
        CipherMode::Ofb,
        CipherMode::Ctr,
    ];

    /// Parse a mode name, case-insensitively. Returns `None` for anything
    /// outside the five known names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "ECB" => Some(CipherMode::Ecb),
            "CBC" => Some(CipherMode::Cbc),
            "CFB" => Some(CipherMode::Cfb),
            "OFB" => Some(CipherMode::Ofb),
            "CTR" => Some(CipherMode::Ctr),
            _ => None,
        }
    }

    /// Canonical uppercase name, as persisted
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherMode::Ecb => "ECB",
            CipherMode::Cbc => "CBC",
            CipherMode::Cfb => "CFB",
            CipherMode::Ofb => "OFB",
            CipherMode::Ctr => "CTR",
        }
    }

    /// Whether ciphertext carries PKCS#7 padding (and therefore has a
    /// length that is a multiple of the block size)
    pub fn uses_padding(&self) -> bool {
        matches!(self, CipherMode::Ecb | CipherMode::Cbc)
    }

    /// Encrypt a buffer under this mode.
    ///
    /// Infallible: padded modes grow the output to the next block boundary
    /// (a full extra block when the input is already aligned), stream modes
    /// return exactly `plaintext.len()` bytes.
    pub fn encrypt(&self, plaintext: &[u8], key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Vec<u8> {
        match self {
            CipherMode::Ecb => EcbEnc::new(key.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            CipherMode::Cbc => {
                CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
            }
            CipherMode::Cfb => {
                let mut buf = plaintext.to_vec();
                CfbEnc::new(key.into(), iv.into()).encrypt(&mut buf);
                buf
            }
            CipherMode::Ofb => {
                let mut buf = plaintext.to_vec();
                OfbStream::new(key.into(), iv.into()).apply_keystream(&mut buf);
                buf
            }
            CipherMode::Ctr => {
                let mut buf = plaintext.to_vec();
                CtrStream::new(key.into(), iv.into()).apply_keystream(&mut buf);
                buf
            }
        }
    }

    /// Decrypt a buffer under this mode.
    ///
    /// For ECB/CBC a ciphertext that is not block-aligned, or whose final
    /// block does not unpad as valid PKCS#7, fails with
    /// [`VaultError::Decryption`]; a wrong key and corrupted ciphertext are
    /// indistinguishable here. Stream modes always produce output; whether
    /// the bytes are meaningful is for the caller to judge.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &[u8; KEY_LEN],
        iv: &[u8; IV_LEN],
    ) -> VaultResult<Vec<u8>> {
        match self {
            CipherMode::Ecb => EcbDec::new(key.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| VaultError::Decryption),
            CipherMode::Cbc => CbcDec::new(key.into(), iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| VaultError::Decryption),
            CipherMode::Cfb => {
                let mut buf = ciphertext.to_vec();
                CfbDec::new(key.into(), iv.into()).decrypt(&mut buf);
                Ok(buf)
            }
            CipherMode::Ofb => {
                // OFB keystream is independent of the data; decryption is
                // the same XOR as encryption
                let mut buf = ciphertext.to_vec();
                OfbStream::new(key.into(), iv.into()).apply_keystream(&mut buf);
                Ok(buf)
            }
            CipherMode::Ctr => {
                let mut buf = ciphertext.to_vec();
                CtrStream::new(key.into(), iv.into()).apply_keystream(&mut buf);
                Ok(buf)
            }
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherMode {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CipherMode::parse(s).ok_or_else(|| VaultError::UnknownMode(s.to_string()))
    }
}
