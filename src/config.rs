//! Configuration types for synosend
//!
//! This is the static, process-level configuration. The user-editable NAS
//! credentials live in the [`SettingsStore`](crate::store::SettingsStore) instead.

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// HTTP client settings for talking to the NAS
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Accept self-signed TLS certificates (default: false)
    ///
    /// Synology devices ship with a self-signed certificate unless the owner
    /// installs one. Only enable this for NAS hosts on a trusted network.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Per-request timeout (None = transport default)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            request_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Main configuration for [`SynoSend`](crate::SynoSend)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// SQLite settings database (default: "./synosend.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Session label passed to the NAS on login (default: "DownloadStation")
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Fetch and log Download Station info after login (default: false)
    #[serde(default)]
    pub probe_download_station_info: bool,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            session_name: default_session_name(),
            probe_download_station_info: false,
            http: HttpConfig::default(),
        }
    }
}

impl HttpConfig {
    /// Build the reqwest client described by this configuration
    pub fn build_client(&self) -> crate::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| crate::Error::Transport(format!("failed to create HTTP client: {e}")))
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./synosend.db")
}

fn default_session_name() -> String {
    "DownloadStation".to_string()
}

fn default_user_agent() -> String {
    format!("synosend/{}", env!("CARGO_PKG_VERSION"))
}

mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
