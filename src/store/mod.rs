//! Settings persistence
//!
//! All persisted state (NAS credentials, download location, the encryption key
//! blob) goes through one injected [`SettingsStore`]. Two backends ship with
//! the crate:
//! - [`MemoryStore`]: process-local, for tests and embedders with their own persistence
//! - [`SqliteStore`]: SQLite file, safe to share between processes

use async_trait::async_trait;
use std::collections::HashMap;

use crate::Result;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persisted settings keys
///
/// The names match the storage layout of the browser extension this crate
/// serves, so existing stores can be read as-is.
pub mod keys {
    /// NAS base URL
    pub const NAS_URL: &str = "nasUrl";
    /// Account name
    pub const USERNAME: &str = "username";
    /// Base64 AES-GCM ciphertext of the password
    pub const ENCRYPTED_PASSWORD: &str = "encryptedPassword";
    /// Base64 nonce paired with [`ENCRYPTED_PASSWORD`]
    pub const PASSWORD_IV: &str = "passwordIV";
    /// Destination folder on the NAS
    pub const DOWNLOAD_LOCATION: &str = "downloadLocation";
    /// Base64 encryption key blob
    pub const ENCRYPTION_KEY: &str = "encryptionKey";

    /// Fields a submission cannot run without
    pub const CREDENTIAL_FIELDS: [&str; 4] =
        [NAS_URL, USERNAME, ENCRYPTED_PASSWORD, PASSWORD_IV];
}

/// Opaque key-value configuration store
///
/// Implementations must make [`set_many`](Self::set_many) and
/// [`put_if_absent`](Self::put_if_absent) atomic: a reader never observes half
/// of a `set_many`, and two racing `put_if_absent` calls agree on one value.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read several keys in one consistent snapshot
    ///
    /// Absent keys are simply missing from the returned map.
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, String>>;

    /// Write several keys atomically
    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()>;

    /// Store `value` under `key` unless the key already exists
    ///
    /// Returns whichever value is stored once the call completes.
    async fn put_if_absent(&self, key: &str, value: &str) -> Result<String>;

    /// Read a single key
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_many(&[key]).await?.remove(key))
    }
}
