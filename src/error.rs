//! Error types for synosend
//!
//! Every step of a submission converts its local failure into one [`Error`]
//! variant before returning. The orchestrator never sees raw transport or
//! parser errors, and each variant maps to exactly one user-facing
//! notification message via [`ToNotification`].

use thiserror::Error;

/// Result type alias for synosend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for synosend
#[derive(Debug, Error)]
pub enum Error {
    /// Neither the link, the element source nor the media probe produced a URL
    #[error("no link or media URL found in the clicked element")]
    NoTargetUrl,

    /// Required credential fields are absent from the settings store
    #[error("NAS settings are missing: {}", .fields.join(", "))]
    ConfigMissing {
        /// Names of the missing settings keys
        fields: Vec<&'static str>,
    },

    /// The configured NAS URL is not an absolute http(s) URL
    #[error("invalid NAS URL {url:?}: {reason}")]
    InvalidNasUrl {
        /// The rejected value
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Stored ciphertext could not be opened with the current key
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Key import or sealing failed
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// API metadata missing or malformed
    #[error("API discovery failed: {0}")]
    Discovery(String),

    /// Login returned no session id
    #[error("login failed{}", .code.map(|c| format!(" (code {c})")).unwrap_or_default())]
    Login {
        /// Vendor error code, when the NAS reported one
        code: Option<i64>,
    },

    /// Network failure talking to the NAS
    #[error("transport error: {0}")]
    Transport(String),

    /// The NAS answered with a body that is not JSON
    #[error("response is not valid JSON: {reason}")]
    ResponseParse {
        /// Parser error
        reason: String,
        /// Raw body, kept for logging
        body: String,
    },

    /// The NAS rejected the create-task call
    #[error("task creation failed with code {code}: {message}")]
    TaskFailure {
        /// Vendor error code (or "unknown")
        code: String,
        /// Vendor error message
        message: String,
    },

    /// Settings storage failed
    #[error("settings store error: {0}")]
    Store(#[from] StoreError),
}

/// Settings-store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("failed to open settings store: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}

impl Error {
    /// Classify a reqwest failure as a transport error.
    ///
    /// The request URL is stripped first: login requests carry the password
    /// in their query string.
    pub(crate) fn transport(error: reqwest::Error) -> Self {
        let error = error.without_url();
        let message = if error.is_timeout() {
            format!("request timed out: {error}")
        } else if error.is_connect() {
            format!("connection failed: {error}")
        } else {
            error.to_string()
        };
        Error::Transport(message)
    }
}

/// Title used on every notification
pub const NOTIFICATION_TITLE: &str = "SynoSend";

/// Convert errors into the message shown to the user
pub trait ToNotification {
    /// Human-readable notification text
    fn notification_message(&self) -> String;

    /// Stable machine-readable error code
    fn error_code(&self) -> &'static str;
}

impl ToNotification for Error {
    fn notification_message(&self) -> String {
        match self {
            Error::NoTargetUrl => "No valid link or media URL found to send.".to_string(),
            Error::ConfigMissing { .. } | Error::InvalidNasUrl { .. } => {
                "NAS settings are missing. Please open the options page.".to_string()
            }
            Error::Decryption(_) => {
                "Stored password could not be decrypted. Please re-enter it in the options page."
                    .to_string()
            }
            Error::Discovery(_) => "Failed to get Synology API info.".to_string(),
            Error::Login { .. } => "Login to Synology NAS failed.".to_string(),
            Error::Transport(_) => "Could not connect to Synology NAS.".to_string(),
            Error::ResponseParse { .. } => {
                "Task failed: Invalid response from Synology.".to_string()
            }
            Error::TaskFailure { code, message } => {
                format!("Task failed: code {code}\n{message}")
            }
            Error::Encryption(_) | Error::Store(_) => {
                "An unexpected error occurred. Check logs.".to_string()
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Error::NoTargetUrl => "no_target_url",
            Error::ConfigMissing { .. } => "config_missing",
            Error::InvalidNasUrl { .. } => "invalid_nas_url",
            Error::Decryption(_) => "decryption_error",
            Error::Encryption(_) => "encryption_error",
            Error::Discovery(_) => "discovery_error",
            Error::Login { .. } => "login_error",
            Error::Transport(_) => "transport_error",
            Error::ResponseParse { .. } => "response_parse_error",
            Error::TaskFailure { .. } => "task_failure",
            Error::Store(_) => "store_error",
        }
    }
}
