//! AES-256-GCM sealing of the stored password.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, OsRng},
};
use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use zeroize::Zeroizing;

use super::{KeyStore, NONCE_SIZE};
use crate::{Error, Result};

/// Ciphertext and the nonce it was sealed with, both base64-encoded
///
/// The two fields are only meaningful together and are always stored and
/// loaded as a pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedSecret {
    /// Ciphertext with the 16-byte GCM tag appended
    pub ciphertext: String,
    /// 96-bit nonce
    pub nonce: String,
}

/// Encrypts and decrypts credentials with the [`KeyStore`] key
#[derive(Clone, Debug)]
pub struct CredentialCipher {
    keys: Arc<KeyStore>,
}

impl CredentialCipher {
    /// Create a cipher using `keys`
    pub fn new(keys: Arc<KeyStore>) -> Self {
        Self { keys }
    }

    /// Seal `plaintext` under a fresh random nonce
    pub async fn encrypt(&self, plaintext: &str) -> Result<SealedSecret> {
        let key = self.keys.get_or_create_key().await?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = key
            .cipher()
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| Error::Encryption("AES-GCM sealing failed".to_string()))?;

        Ok(SealedSecret {
            ciphertext: Base64::encode_string(&ciphertext),
            nonce: Base64::encode_string(&nonce),
        })
    }

    /// Open a sealed secret
    ///
    /// Any mismatch (wrong key, altered nonce, tampered ciphertext) fails the
    /// tag check and yields [`Error::Decryption`]; no plaintext is produced.
    pub async fn decrypt(&self, sealed: &SealedSecret) -> Result<Zeroizing<String>> {
        let nonce_bytes = Base64::decode_vec(sealed.nonce.trim())
            .map_err(|e| Error::Decryption(format!("nonce is not valid base64: {e}")))?;
        if nonce_bytes.len() != NONCE_SIZE {
            return Err(Error::Decryption(format!(
                "nonce has {} bytes, expected {NONCE_SIZE}",
                nonce_bytes.len()
            )));
        }
        let ciphertext = Base64::decode_vec(sealed.ciphertext.trim())
            .map_err(|e| Error::Decryption(format!("ciphertext is not valid base64: {e}")))?;

        let key = self.keys.get_or_create_key().await?;
        let plaintext = Zeroizing::new(
            key.cipher()
                .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
                .map_err(|_| {
                    Error::Decryption("authentication failed: wrong key or tampered data".into())
                })?,
        );

        let text = std::str::from_utf8(&plaintext)
            .map_err(|_| Error::Decryption("plaintext is not valid UTF-8".into()))?;
        Ok(Zeroizing::new(text.to_string()))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SettingsStore};

    fn cipher_with(store: Arc<dyn SettingsStore>) -> CredentialCipher {
        CredentialCipher::new(Arc::new(KeyStore::new(store)))
    }

    fn fresh_cipher() -> CredentialCipher {
        cipher_with(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn decrypt_returns_original_plaintext() {
        let cipher = fresh_cipher();
        let long = "x".repeat(4096);

        for plaintext in ["hunter2", "", "pässwörd with ünïcode ✓", long.as_str()] {
            let sealed = cipher.encrypt(plaintext).await.unwrap();
            assert_eq!(cipher.decrypt(&sealed).await.unwrap().as_str(), plaintext);
        }
    }

    #[tokio::test]
    async fn nonce_is_fresh_for_every_call() {
        let cipher = fresh_cipher();

        let a = cipher.encrypt("same").await.unwrap();
        let b = cipher.encrypt("same").await.unwrap();

        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
        assert_eq!(Base64::decode_vec(&a.nonce).unwrap().len(), NONCE_SIZE);
    }

    #[tokio::test]
    async fn different_key_fails() {
        let sealed = fresh_cipher().encrypt("secret").await.unwrap();

        let err = fresh_cipher().decrypt(&sealed).await.unwrap_err();
        assert!(matches!(err, Error::Decryption(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn altered_nonce_fails() {
        let cipher = fresh_cipher();
        let mut sealed = cipher.encrypt("secret").await.unwrap();

        let mut nonce = Base64::decode_vec(&sealed.nonce).unwrap();
        nonce[0] ^= 0x01;
        sealed.nonce = Base64::encode_string(&nonce);

        let err = cipher.decrypt(&sealed).await.unwrap_err();
        assert!(matches!(err, Error::Decryption(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn tampered_ciphertext_fails() {
        let cipher = fresh_cipher();
        let mut sealed = cipher.encrypt("secret").await.unwrap();

        let mut bytes = Base64::decode_vec(&sealed.ciphertext).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        sealed.ciphertext = Base64::encode_string(&bytes);

        let err = cipher.decrypt(&sealed).await.unwrap_err();
        assert!(matches!(err, Error::Decryption(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn wrong_length_or_garbage_nonce_fails_without_panicking() {
        let cipher = fresh_cipher();
        let sealed = cipher.encrypt("secret").await.unwrap();

        let short = SealedSecret {
            nonce: Base64::encode_string(&[0u8; 8]),
            ..sealed.clone()
        };
        assert!(matches!(
            cipher.decrypt(&short).await.unwrap_err(),
            Error::Decryption(_)
        ));

        let garbage = SealedSecret {
            nonce: "%%%".into(),
            ..sealed
        };
        assert!(matches!(
            cipher.decrypt(&garbage).await.unwrap_err(),
            Error::Decryption(_)
        ));
    }

    #[tokio::test]
    async fn key_survives_a_new_cipher_over_the_same_store() {
        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());
        let sealed = cipher_with(store.clone()).encrypt("secret").await.unwrap();

        let reopened = cipher_with(store);
        assert_eq!(reopened.decrypt(&sealed).await.unwrap().as_str(), "secret");
    }
}
