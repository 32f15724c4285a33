//! Encrypted on-disk key-value store.
//!
//! # Storage layout
//!
//! ```text
//! ~/.sdi/
//!   storage/            (mode 0700)
//!     <namespace>.json  (mode 0600)
//! ```
//!
//! The document maps each key to `hex(nonce || ciphertext)`. Values are
//! JSON-serialized and sealed with ChaCha20-Poly1305 under a key derived from
//! the configured secret (SHA-256); the entry key is bound as associated data
//! so ciphertexts cannot be swapped between keys.
//!
//! Writes use the atomic `.tmp` + rename pattern.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{io_err, StoreError};
use crate::settings;
use crate::store::KeyValueStore;

const DOCUMENT_VERSION: u32 = 1;
const NONCE_LEN: usize = 12;

/// On-disk document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct StoreDocument {
    version: u32,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl StoreDocument {
    fn empty() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            updated_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }
}

/// File-backed [`KeyValueStore`] with per-value authenticated encryption.
pub struct SecureFileStore {
    path: PathBuf,
    cipher: ChaCha20Poly1305,
}

impl fmt::Debug for SecureFileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureFileStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// `<home>/.sdi/storage/<namespace>.json`. Pure, no I/O.
pub fn store_path_at(home: &Path, namespace: &str) -> PathBuf {
    settings::storage_dir_at(home).join(format!("{namespace}.json"))
}

impl SecureFileStore {
    /// Open the store for `namespace` under `home`. The file is created on
    /// first write.
    pub fn open_at(home: &Path, namespace: &str, secret: &str) -> Self {
        Self::with_path(store_path_at(home, namespace), secret)
    }

    /// `open_at` convenience wrapper using `dirs::home_dir()`.
    pub fn open(namespace: &str, secret: &str) -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::HomeNotFound)?;
        Ok(Self::open_at(&home, namespace, secret))
    }

    /// Open a store at an explicit file path.
    pub fn with_path(path: PathBuf, secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let cipher = ChaCha20Poly1305::new(Key::from_slice(digest.as_slice()));
        Self { path, cipher }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keys currently present, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.load_document()?.entries.into_keys().collect())
    }

    fn load_document(&self) -> Result<StoreDocument, StoreError> {
        if !self.path.exists() {
            return Ok(StoreDocument::empty());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| io_err(&self.path, e))?;
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Document to modify. An unparseable document is replaced by an empty
    /// one; the flag reports that it was discarded.
    fn load_for_update(&self) -> Result<(StoreDocument, bool), StoreError> {
        match self.load_document() {
            Ok(document) => Ok((document, false)),
            Err(err @ StoreError::Parse { .. }) => {
                tracing::warn!(path = %self.path.display(), error = %err, "discarding corrupt store document");
                Ok((StoreDocument::empty(), true))
            }
            Err(err) => Err(err),
        }
    }

    fn save_document(&self, document: &mut StoreDocument) -> Result<(), StoreError> {
        let Some(dir) = self.path.parent() else {
            return Err(io_err(
                &self.path,
                std::io::Error::other("invalid store path"),
            ));
        };
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
            set_dir_permissions(dir)?;
        }

        document.updated_at = Utc::now();
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }

    fn seal(&self, key: &str, value: &Value) -> Result<String, StoreError> {
        let plaintext = serde_json::to_vec(value)?;
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: &plaintext,
                    aad: key.as_bytes(),
                },
            )
            .map_err(|_| StoreError::Encrypt { key: key.into() })?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(nonce.as_slice());
        blob.extend_from_slice(&ciphertext);
        Ok(hex::encode(blob))
    }

    fn unseal(&self, key: &str, sealed: &str) -> Result<Value, StoreError> {
        let blob = hex::decode(sealed).map_err(|e| StoreError::Encoding {
            key: key.into(),
            reason: e.to_string(),
        })?;
        if blob.len() < NONCE_LEN {
            return Err(StoreError::Encoding {
                key: key.into(),
                reason: format!("{} bytes is shorter than a nonce", blob.len()),
            });
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: key.as_bytes(),
                },
            )
            .map_err(|_| StoreError::Decrypt { key: key.into() })?;
        Ok(serde_json::from_slice(&plaintext)?)
    }
}

impl KeyValueStore for SecureFileStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let document = self.load_document()?;
        document
            .entries
            .get(key)
            .map(|sealed| self.unseal(key, sealed))
            .transpose()
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let (mut document, _) = self.load_for_update()?;
        let sealed = self.seal(key, &value)?;
        document.entries.insert(key.to_string(), sealed);
        self.save_document(&mut document)?;
        tracing::debug!(key, path = %self.path.display(), "stored value");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let (mut document, discarded) = self.load_for_update()?;
        if document.entries.remove(key).is_none() && !discarded {
            return Ok(());
        }
        self.save_document(&mut document)?;
        tracing::debug!(key, path = %self.path.display(), "removed value");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
