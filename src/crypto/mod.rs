//! Credential encryption at rest
//!
//! The NAS password is stored as AES-256-GCM ciphertext plus nonce. The key is
//! a random 256-bit value created lazily on first use and persisted in the
//! settings store; see [`KeyStore`].

mod cipher;
mod keystore;

pub use cipher::{CredentialCipher, SealedSecret};
pub use keystore::{EncryptionKey, KeyStore};

/// Size of the encryption key in bytes
pub const KEY_SIZE: usize = 32;
/// Size of the AES-GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;
