//! # PixVault
//!
//! Password-protected encrypted image vault with selectable AES-256
//! block-cipher modes.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        PIXVAULT                           │
//! │  ┌──────────────┐  ┌───────────────┐  ┌────────────────┐  │
//! │  │ AUTHENTICATOR│  │ ENCRYPTION    │  │  IMAGE STORE   │  │
//! │  │ Argon2id PHC │  │ ENGINE        │  │  (SQLite)      │  │
//! │  └──────┬───────┘  └──────┬────────┘  └───────┬────────┘  │
//! │         │                 │                   │           │
//! │  ┌──────┴─────────────────┴───────────────────┴────────┐  │
//! │  │                   VAULT API                         │  │
//! │  │   upload / gallery / decrypt / export / delete      │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! │                                                           │
//! │  ┌──────────────┐  ┌───────────────┐  ┌────────────────┐  │
//! │  │ KDF (fixed   │  │ MODE STRATEGY │  │  CLI BINARY    │  │
//! │  │ salt Argon2) │  │ ECB..CTR      │  │                │  │
//! │  └──────────────┘  └───────────────┘  └────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Model
//!
//! - Every image encrypted with AES-256 under a user-chosen mode
//!   (ECB, CBC, CFB, OFB or CTR; ECB kept to demonstrate its weakness)
//! - Cipher key derived from the password with Argon2id (deterministic,
//!   fixed application salt); never stored
//! - Access gated by an independent salted Argon2id credential hash;
//!   credential and key are not interchangeable
//! - Fresh CSPRNG IV per record; authentication and padding failures are
//!   indistinguishable at the public surface

pub mod api;
pub mod crypto;
pub mod error;
pub mod store;

pub use api::{DecryptedImage, EncryptedView, ImageVaultApi, UploadReceipt, UploadRequest};
pub use crypto::{is_valid_mode, CipherMode, EncryptedImage, EncryptionEngine};
pub use error::{VaultError, VaultResult};
pub use store::{ImageRecord, ImageStore, ImageSummary};

/// PixVault version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
