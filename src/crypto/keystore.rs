//! Process-lifetime encryption key management.

use aes_gcm::{Aes256Gcm, KeyInit};
use base64ct::{Base64, Encoding};
use rand::RngCore;
use rand::rngs::OsRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

use super::KEY_SIZE;
use crate::store::{SettingsStore, keys};
use crate::{Error, Result};

/// Imported symmetric key
///
/// Holds only the initialised cipher; the raw key bytes are wiped after
/// import and cannot be read back.
#[derive(Clone)]
pub struct EncryptionKey {
    cipher: Arc<Aes256Gcm>,
}

impl EncryptionKey {
    /// Decode a persisted key blob and import it
    fn import(blob: &str) -> Result<Self> {
        let raw = Zeroizing::new(
            Base64::decode_vec(blob.trim())
                .map_err(|e| Error::Decryption(format!("stored encryption key is corrupt: {e}")))?,
        );

        if raw.len() != KEY_SIZE {
            return Err(Error::Decryption(format!(
                "stored encryption key has {} bytes, expected {KEY_SIZE}",
                raw.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&raw)
            .map_err(|e| Error::Encryption(format!("failed to import key: {e}")))?;

        Ok(Self {
            cipher: Arc::new(cipher),
        })
    }

    pub(crate) fn cipher(&self) -> &Aes256Gcm {
        &self.cipher
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// Lazily creates, persists and caches the encryption key
///
/// Creation runs under an async mutex, and the blob is written with
/// [`SettingsStore::put_if_absent`]; whichever blob the store keeps is the one
/// imported. Concurrent first callers, in this process or another one sharing
/// the store, therefore end up with the same key.
pub struct KeyStore {
    store: Arc<dyn SettingsStore>,
    key: Mutex<Option<EncryptionKey>>,
}

impl KeyStore {
    /// Create a key store backed by `store`
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            key: Mutex::new(None),
        }
    }

    /// Return the persisted key, creating it on first use
    pub async fn get_or_create_key(&self) -> Result<EncryptionKey> {
        let mut slot = self.key.lock().await;
        if let Some(key) = slot.as_ref() {
            return Ok(key.clone());
        }

        let blob = match self.store.get(keys::ENCRYPTION_KEY).await? {
            Some(blob) => Zeroizing::new(blob),
            None => self.create_key().await?,
        };

        let key = EncryptionKey::import(&blob)?;
        *slot = Some(key.clone());
        Ok(key)
    }

    async fn create_key(&self) -> Result<Zeroizing<String>> {
        let mut raw = Zeroizing::new([0u8; KEY_SIZE]);
        OsRng.fill_bytes(&mut raw[..]);
        let encoded = Zeroizing::new(Base64::encode_string(&raw[..]));

        let stored = Zeroizing::new(
            self.store
                .put_if_absent(keys::ENCRYPTION_KEY, &encoded)
                .await?,
        );

        if *stored == *encoded {
            tracing::info!("created new credential encryption key");
        } else {
            tracing::debug!("encryption key was created concurrently, using the stored one");
        }

        Ok(stored)
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore").finish_non_exhaustive()
    }
}
