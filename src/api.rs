//! PixVault - Unified Vault API
//!
//! Single entry point composing the password authenticator, the encryption
//! engine, and the record store. Owns request validation and the base64
//! encodings of the persisted fields; the engine itself only ever sees raw
//! bytes.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::crypto::{hash_password, CipherMode, EncryptionEngine};
use crate::error::{VaultError, VaultResult};
use crate::store::{ImageRecord, ImageStore, ImageSummary};

/// Mode used when the uploader does not pick one
const DEFAULT_MODE: &str = "CBC";

/// An upload request: image bytes plus the user-supplied fields
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    /// Display name, required
    pub name: &'a str,
    /// Filename the bytes came from
    pub original_name: &'a str,
    /// Password protecting this image, required
    pub password: &'a str,
    /// Cipher mode name, any casing; defaults to CBC
    pub mode: Option<&'a str>,
    /// The image bytes, required
    pub bytes: &'a [u8],
}

/// What the uploader gets back. Never carries ciphertext or credential.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub id: String,
    pub name: String,
    pub original_name: String,
    pub mime_type: String,
    pub cipher_mode: CipherMode,
    /// Base64, as persisted
    pub iv: String,
    pub ciphertext_len: usize,
    pub created_at: DateTime<Utc>,
}

/// The encrypted bytes of one record, for the scrambled-preview surface
#[derive(Debug, Clone, Serialize)]
pub struct EncryptedView {
    pub ciphertext: String,
    pub original_name: String,
    pub mime_type: String,
}

/// A successful decryption
#[derive(Debug, Clone)]
pub struct DecryptedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub original_name: String,
    pub cipher_mode: CipherMode,
}

/// PixVault API - the only surface collaborators talk to
pub struct ImageVaultApi {
    store: ImageStore,
    engine: EncryptionEngine,
}

impl ImageVaultApi {
    /// Open (or create) a vault backed by the given database file
    pub fn open<P: AsRef<Path>>(db_path: P) -> VaultResult<Self> {
        Ok(Self {
            store: ImageStore::open(db_path)?,
            engine: EncryptionEngine::new(),
        })
    }

    /// Vault backed by an in-memory store
    pub fn open_in_memory() -> VaultResult<Self> {
        Ok(Self {
            store: ImageStore::open_in_memory()?,
            engine: EncryptionEngine::new(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // UPLOAD
    // ═══════════════════════════════════════════════════════════════════════

    /// Encrypt an image and persist the record.
    ///
    /// The password is consumed twice, through two non-interchangeable
    /// derivations: once into the salted credential stored for later
    /// verification, once into the cipher key that never leaves the engine.
    pub fn upload(&self, request: UploadRequest<'_>) -> VaultResult<UploadReceipt> {
        if request.name.is_empty() {
            return Err(VaultError::Validation("name is required".into()));
        }
        if request.password.is_empty() {
            return Err(VaultError::Validation("password is required".into()));
        }
        if request.bytes.is_empty() {
            return Err(VaultError::Validation("image data is required".into()));
        }

        let mode_name = request.mode.unwrap_or(DEFAULT_MODE);
        let credential = hash_password(request.password)?;
        let encrypted = self.engine.encrypt(request.bytes, request.password, mode_name)?;

        let record = ImageRecord {
            id: Uuid::new_v4().to_string(),
            name: request.name.to_string(),
            original_name: request.original_name.to_string(),
            mime_type: detect_mime(request.bytes),
            auth_credential: credential,
            cipher_mode: encrypted.mode,
            iv: BASE64.encode(encrypted.iv),
            ciphertext: BASE64.encode(&encrypted.ciphertext),
            created_at: Utc::now(),
        };

        self.store.insert(&record)?;

        log::info!(
            "uploaded image {} ({} bytes, mode {})",
            record.id,
            request.bytes.len(),
            record.cipher_mode
        );

        Ok(UploadReceipt {
            id: record.id,
            name: record.name,
            original_name: record.original_name,
            mime_type: record.mime_type,
            cipher_mode: record.cipher_mode,
            iv: record.iv,
            ciphertext_len: encrypted.ciphertext.len(),
            created_at: record.created_at,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // READ
    // ═══════════════════════════════════════════════════════════════════════

    /// List all images, newest first, secrets excluded
    pub fn gallery(&self) -> VaultResult<Vec<ImageSummary>> {
        self.store.list()
    }

    /// Encrypted payload of one record, still base64, for display as-is
    pub fn encrypted_view(&self, id: &str) -> VaultResult<EncryptedView> {
        let record = self.store.get(id)?;

        Ok(EncryptedView {
            ciphertext: record.ciphertext,
            original_name: record.original_name,
            mime_type: record.mime_type,
        })
    }

    /// Raw ciphertext bytes for download, plus the record's display name
    pub fn export_encrypted(&self, id: &str) -> VaultResult<(String, Vec<u8>)> {
        let record = self.store.get(id)?;
        let bytes = decode_stored(&record.id, "ciphertext", &record.ciphertext)?;

        Ok((record.name, bytes))
    }

    /// Authenticate and decrypt one image.
    ///
    /// A pure read: the record is never mutated, and the call can be
    /// repeated indefinitely with the same result.
    pub fn decrypt(&self, id: &str, password: &str) -> VaultResult<DecryptedImage> {
        let record = self.store.get(id)?;

        let ciphertext = decode_stored(&record.id, "ciphertext", &record.ciphertext)?;
        let iv = decode_stored(&record.id, "iv", &record.iv)?;

        let bytes = self.engine.decrypt(
            &record.auth_credential,
            &ciphertext,
            &iv,
            record.cipher_mode.as_str(),
            password,
        )?;

        log::info!("decrypted image {} ({})", record.id, record.cipher_mode);

        Ok(DecryptedImage {
            bytes,
            mime_type: record.mime_type,
            original_name: record.original_name,
            cipher_mode: record.cipher_mode,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DELETE
    // ═══════════════════════════════════════════════════════════════════════

    /// Destroy a record. The only mutation after upload.
    pub fn delete(&self, id: &str) -> VaultResult<()> {
        self.store.delete(id)?;
        log::info!("deleted image {}", id);
        Ok(())
    }
}

fn decode_stored(id: &str, field: &str, value: &str) -> VaultResult<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| VaultError::Corrupted(format!("record {}: bad base64 in {}: {}", id, field, e)))
}

/// Detect MIME type from file content
fn detect_mime(data: &[u8]) -> String {
    if data.len() < 8 {
        return "application/octet-stream".into();
    }

    match &data[0..8] {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg".into(),
        [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] => "image/png".into(),
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif".into(),
        [0x52, 0x49, 0x46, 0x46, ..] => {
            if data.len() > 12 && &data[8..12] == b"WEBP" {
                "image/webp".into()
            } else {
                "application/octet-stream".into()
            }
        }
        _ => {
            if data.len() > 12 && &data[4..8] == b"ftyp" {
                if &data[8..12] == b"heic" || &data[8..12] == b"heix" {
                    return "image/heic".into();
                }
                if &data[8..12] == b"mif1" {
                    return "image/heif".into();
                }
            }
            "application/octet-stream".into()
        }
    }
}
