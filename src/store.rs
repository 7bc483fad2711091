//! PixVault - Image Record Store
//!
//! SQLite-backed store for encrypted image records. The crypto engine never
//! sees this module; the vault API composes the two. Consistency
//! (read-your-writes, atomic delete) comes from SQLite itself.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::crypto::CipherMode;
use crate::error::{VaultError, VaultResult};

/// A persisted encrypted image.
///
/// `ciphertext` and `iv` are base64 text, `auth_credential` is a PHC hash
/// string. Immutable after insert; there is no update or re-encrypt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Unique ID, assigned at insert
    pub id: String,
    /// User-chosen display name
    pub name: String,
    /// Filename at upload time
    pub original_name: String,
    /// Detected MIME type
    pub mime_type: String,
    /// Salted credential hash, authentication only
    pub auth_credential: String,
    /// Mode the ciphertext was produced under
    pub cipher_mode: CipherMode,
    /// 16 random bytes, base64
    pub iv: String,
    /// Encrypted bytes, base64
    pub ciphertext: String,
    /// Insert timestamp
    pub created_at: DateTime<Utc>,
}

/// Gallery projection: everything except the ciphertext and the credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: String,
    pub name: String,
    pub original_name: String,
    pub mime_type: String,
    pub cipher_mode: CipherMode,
    pub created_at: DateTime<Utc>,
}

/// SQLite-backed record store
pub struct ImageStore {
    conn: Mutex<Connection>,
}

impl ImageStore {
    /// Open (or create) a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> VaultResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests
    pub fn open_in_memory() -> VaultResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> VaultResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS images (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                original_name   TEXT NOT NULL,
                mime_type       TEXT NOT NULL,
                auth_credential TEXT NOT NULL,
                cipher_mode     TEXT NOT NULL,
                iv              TEXT NOT NULL,
                ciphertext      TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_images_created ON images(created_at);
            "#,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a record. IDs are caller-assigned (UUID v4 at the API layer)
    /// and must be unique.
    pub fn insert(&self, record: &ImageRecord) -> VaultResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO images
             (id, name, original_name, mime_type, auth_credential, cipher_mode, iv, ciphertext, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.name,
                record.original_name,
                record.mime_type,
                record.auth_credential,
                record.cipher_mode.as_str(),
                record.iv,
                record.ciphertext,
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Fetch a full record by ID
    pub fn get(&self, id: &str) -> VaultResult<ImageRecord> {
        let conn = self.conn.lock();

        let row = conn
            .query_row(
                "SELECT id, name, original_name, mime_type, auth_credential,
                        cipher_mode, iv, ciphertext, created_at
                 FROM images WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                        row.get::<_, String>(8)?,
                    ))
                },
            )
            .optional()?;

        let (id, name, original_name, mime_type, auth_credential, mode, iv, ciphertext, created) =
            row.ok_or_else(|| VaultError::NotFound(id.to_string()))?;

        Ok(ImageRecord {
            cipher_mode: parse_mode_column(&id, &mode)?,
            created_at: parse_timestamp_column(&id, &created)?,
            id,
            name,
            original_name,
            mime_type,
            auth_credential,
            iv,
            ciphertext,
        })
    }

    /// List all records as gallery summaries, newest first. Never returns
    /// ciphertext or credentials.
    pub fn list(&self) -> VaultResult<Vec<ImageSummary>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            "SELECT id, name, original_name, mime_type, cipher_mode, created_at
             FROM images ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, name, original_name, mime_type, mode, created) = row?;
            summaries.push(ImageSummary {
                cipher_mode: parse_mode_column(&id, &mode)?,
                created_at: parse_timestamp_column(&id, &created)?,
                id,
                name,
                original_name,
                mime_type,
            });
        }

        Ok(summaries)
    }

    /// Delete a record by ID
    pub fn delete(&self, id: &str) -> VaultResult<()> {
        let conn = self.conn.lock();

        let affected = conn.execute("DELETE FROM images WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(VaultError::NotFound(id.to_string()));
        }

        Ok(())
    }

    /// Count stored records
    pub fn count(&self) -> VaultResult<usize> {
        let conn = self.conn.lock();

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn parse_mode_column(id: &str, value: &str) -> VaultResult<CipherMode> {
    CipherMode::parse(value)
        .ok_or_else(|| VaultError::Corrupted(format!("record {}: unknown cipher mode {}", id, value)))
}

fn parse_timestamp_column(id: &str, value: &str) -> VaultResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| VaultError::Corrupted(format!("record {}: bad timestamp: {}", id, e)))
}
