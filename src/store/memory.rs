//! In-memory settings store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::SettingsStore;
use crate::Result;

/// Settings held in a process-local map
///
/// Every operation takes the same lock, which makes `set_many` and
/// `put_if_absent` atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        let entries = self.entries.lock().await;
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set_many(&self, new_entries: &[(&str, String)]) -> Result<()> {
        let mut entries = self.entries.lock().await;
        for (key, value) in new_entries {
            entries.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> Result<String> {
        let mut entries = self.entries.lock().await;
        Ok(entries
            .entry(key.to_string())
            .or_insert_with(|| value.to_string())
            .clone())
    }
}
