//! PixVault - Cryptographic Core
//!
//! Two independent derivations of the same password (credential vs cipher
//! key), five cipher mode strategies, and the engine that sequences them.

pub mod auth;
pub mod engine;
pub mod kdf;
pub mod modes;

pub use auth::{hash_password, verify_password};
pub use engine::{is_valid_mode, EncryptedImage, EncryptionEngine};
pub use kdf::derive_cipher_key;
pub use modes::{CipherMode, IV_LEN, KEY_LEN};
