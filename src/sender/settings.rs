//! Options-page operations: save, load and test the NAS settings.

use serde::Serialize;
use std::time::{Duration, Instant};
use zeroize::Zeroizing;

use super::SynoSend;
use crate::crypto::SealedSecret;
use crate::destination::DEFAULT_DESTINATION;
use crate::store::keys;
use crate::syno::auth::{DEFAULT_AUTH_VERSION, session_from_response};
use crate::syno::{API_AUTH, error_code, is_success};
use crate::types::{ApiEndpoint, Credential};
use crate::{Error, Result};

/// Auth path used by the connection test, before any discovery
const TEST_AUTH_PATH: &str = "auth.cgi";

/// What the options page edits
///
/// The password is held in plaintext only here and is wiped on drop.
#[derive(Clone)]
pub struct Settings {
    /// NAS base URL
    pub nas_url: String,
    /// Account name
    pub username: String,
    /// Plaintext password
    pub password: Zeroizing<String>,
    /// Destination folder on the NAS
    pub download_location: String,
}

impl Settings {
    /// Build settings from form values
    pub fn new(
        nas_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        download_location: impl Into<String>,
    ) -> Self {
        Self {
            nas_url: nas_url.into(),
            username: username.into(),
            password: Zeroizing::new(password.into()),
            download_location: download_location.into(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("nas_url", &self.nas_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("download_location", &self.download_location)
            .finish()
    }
}

/// Result of testing NAS connectivity and credentials
#[derive(Clone, Debug, Serialize)]
pub struct ConnectionTestResult {
    /// Whether login returned a session id
    pub success: bool,

    /// Time taken by the login round trip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<Duration>,

    /// Vendor error code ("unknown" when the NAS gave none), login failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SynoSend {
    /// Encrypt the password and store all settings in one atomic write
    ///
    /// A blank download location is stored as "Downloads".
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let sealed = self.cipher.encrypt(&settings.password).await?;

        let location = match settings.download_location.trim() {
            "" => DEFAULT_DESTINATION.to_string(),
            location => location.to_string(),
        };

        self.store
            .set_many(&[
                (keys::NAS_URL, settings.nas_url.trim().to_string()),
                (keys::USERNAME, settings.username.trim().to_string()),
                (keys::ENCRYPTED_PASSWORD, sealed.ciphertext),
                (keys::PASSWORD_IV, sealed.nonce),
                (keys::DOWNLOAD_LOCATION, location),
            ])
            .await?;

        tracing::info!(
            nas_url = %settings.nas_url.trim(),
            username = %settings.username.trim(),
            "settings saved"
        );
        Ok(())
    }

    /// Load the settings for display
    ///
    /// Missing fields load as empty strings and the location as "Downloads".
    /// A password that no longer decrypts loads as empty so the user can
    /// re-enter it.
    pub async fn load_settings(&self) -> Result<Settings> {
        let mut values = self
            .store
            .get_many(&[
                keys::NAS_URL,
                keys::USERNAME,
                keys::ENCRYPTED_PASSWORD,
                keys::PASSWORD_IV,
                keys::DOWNLOAD_LOCATION,
            ])
            .await?;

        let sealed = match (
            values.remove(keys::ENCRYPTED_PASSWORD),
            values.remove(keys::PASSWORD_IV),
        ) {
            (Some(ciphertext), Some(nonce)) if !ciphertext.is_empty() && !nonce.is_empty() => {
                Some(SealedSecret { ciphertext, nonce })
            }
            _ => None,
        };

        let password = match sealed {
            Some(sealed) => match self.cipher.decrypt(&sealed).await {
                Ok(password) => password,
                Err(Error::Decryption(reason)) => {
                    tracing::warn!(reason = %reason, "failed to decrypt stored password");
                    Zeroizing::new(String::new())
                }
                Err(e) => return Err(e),
            },
            None => Zeroizing::new(String::new()),
        };

        Ok(Settings {
            nas_url: values.remove(keys::NAS_URL).unwrap_or_default(),
            username: values.remove(keys::USERNAME).unwrap_or_default(),
            password,
            download_location: values
                .remove(keys::DOWNLOAD_LOCATION)
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESTINATION.to_string()),
        })
    }

    /// Read the stored credential, still sealed
    ///
    /// Fails with [`Error::ConfigMissing`] naming every absent or blank field.
    pub(crate) async fn load_credential(&self) -> Result<Credential> {
        let mut values = self.store.get_many(&keys::CREDENTIAL_FIELDS).await?;

        let missing: Vec<&'static str> = keys::CREDENTIAL_FIELDS
            .into_iter()
            .filter(|key| values.get(*key).is_none_or(|v| v.trim().is_empty()))
            .collect();
        if !missing.is_empty() {
            tracing::error!(missing = ?missing, "missing NAS credentials");
            return Err(Error::ConfigMissing { fields: missing });
        }

        let mut take = |key: &str| values.remove(key).unwrap_or_default();
        Ok(Credential {
            nas_host: take(keys::NAS_URL),
            username: take(keys::USERNAME),
            password: SealedSecret {
                ciphertext: take(keys::ENCRYPTED_PASSWORD),
                nonce: take(keys::PASSWORD_IV),
            },
        })
    }

    /// Try logging in with unsaved form values
    ///
    /// Uses the fixed `auth.cgi` path at version 7 without discovery. The
    /// login only counts when the NAS answers `"success": true` with a
    /// session id. Blank fields fail with [`Error::ConfigMissing`] and an
    /// unusable URL with [`Error::InvalidNasUrl`]; anything that goes wrong
    /// on the wire is reported in the result instead.
    pub async fn test_connection(
        &self,
        nas_url: &str,
        username: &str,
        password: &str,
    ) -> Result<ConnectionTestResult> {
        let nas_url = nas_url.trim();
        let username = username.trim();

        let missing: Vec<&'static str> = [
            (keys::NAS_URL, nas_url.is_empty()),
            (keys::USERNAME, username.is_empty()),
            ("password", password.is_empty()),
        ]
        .into_iter()
        .filter_map(|(key, blank)| blank.then_some(key))
        .collect();
        if !missing.is_empty() {
            return Err(Error::ConfigMissing { fields: missing });
        }

        let client = crate::syno::SynoClient::new(self.http.clone(), nas_url)?;
        let endpoint = ApiEndpoint {
            name: API_AUTH.to_string(),
            path: TEST_AUTH_PATH.to_string(),
            min_version: None,
            max_version: Some(DEFAULT_AUTH_VERSION),
        };

        let start = Instant::now();
        let result = client
            .login_response(&endpoint, username, password, &self.config.session_name)
            .await
            .and_then(|value| {
                if is_success(&value) {
                    session_from_response(&value)
                } else {
                    Err(Error::Login {
                        code: error_code(&value),
                    })
                }
            });
        let latency = start.elapsed();

        Ok(match result {
            Ok(_) => {
                tracing::info!(nas_url = %nas_url, latency_ms = latency.as_millis() as u64, "connection test succeeded");
                ConnectionTestResult {
                    success: true,
                    latency: Some(latency),
                    error_code: None,
                    error: None,
                }
            }
            Err(e) => {
                let error_code = match &e {
                    Error::Login { code } => Some(
                        code.map_or_else(|| "unknown".to_string(), |c| c.to_string()),
                    ),
                    _ => None,
                };
                tracing::warn!(nas_url = %nas_url, error = %e, "connection test failed");
                ConnectionTestResult {
                    success: false,
                    latency: Some(latency),
                    error_code,
                    error: Some(e.to_string()),
                }
            }
        })
    }
}
