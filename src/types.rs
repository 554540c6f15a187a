//! Core types for synosend

use serde::{Deserialize, Serialize};

use crate::crypto::SealedSecret;
use crate::error::NOTIFICATION_TITLE;

/// Descriptor for one API family, as returned by `SYNO.API.Info`
///
/// Not persisted; rediscovered on every submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    /// API family name (e.g. "SYNO.API.Auth"), filled in from the response key
    #[serde(default, skip_serializing)]
    pub name: String,
    /// CGI path relative to `/webapi/`
    pub path: String,
    /// Lowest supported protocol version
    #[serde(default)]
    pub min_version: Option<u32>,
    /// Highest supported protocol version
    #[serde(default)]
    pub max_version: Option<u32>,
}

impl ApiEndpoint {
    /// Version to use when calling this API
    ///
    /// `maxVersion` if present, else `minVersion`, else `default`. A zero
    /// version counts as absent.
    pub fn negotiated_version(&self, default: u32) -> u32 {
        self.max_version
            .filter(|v| *v > 0)
            .or(self.min_version.filter(|v| *v > 0))
            .unwrap_or(default)
    }
}

/// The two API families a submission needs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// `SYNO.API.Auth`
    pub auth: ApiEndpoint,
    /// `SYNO.DownloadStation2.Task`
    pub task: ApiEndpoint,
}

/// Short-lived login session
///
/// Valid for one submission attempt only; never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    sid: String,
}

impl Session {
    /// Wrap a session id returned by login
    pub fn new(sid: impl Into<String>) -> Self {
        Self { sid: sid.into() }
    }

    /// The raw session id
    pub fn sid(&self) -> &str {
        &self.sid
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("sid", &"<redacted>").finish()
    }
}

/// A create-task request, alive only while the submission is built
#[derive(Debug, Clone, Copy)]
pub struct DownloadTask<'a> {
    /// URL the NAS should download
    pub url: &'a str,
    /// Normalized destination folder on the NAS
    pub destination: &'a str,
    /// Session the request is authorized by
    pub session: &'a Session,
}

/// Classified create-task response
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The NAS accepted the task
    Success,
    /// The NAS rejected the task
    Failure {
        /// Vendor error code, or "unknown"
        code: String,
        /// Vendor error message or its best textual substitute
        message: String,
    },
}

/// Stored NAS credentials with the password still sealed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    /// NAS base URL (e.g. "https://nas.local:5001")
    pub nas_host: String,
    /// Account name
    pub username: String,
    /// Encrypted password and its nonce
    pub password: SealedSecret,
}

/// Kind of element the user right-clicked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    /// An image element
    Image,
    /// A video element
    Video,
    /// An audio element
    Audio,
    /// A plain link or anything else
    #[default]
    Other,
}

impl MediaType {
    /// Whether the page may need probing for the element's current source
    pub fn is_playable(&self) -> bool {
        matches!(self, MediaType::Video | MediaType::Audio)
    }
}

/// What the context-menu click handed over
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTarget {
    /// `href` of the clicked link
    #[serde(default)]
    pub link_url: Option<String>,
    /// `src` of the clicked media element
    #[serde(default)]
    pub src_url: Option<String>,
    /// Kind of media element, if any
    #[serde(default)]
    pub media_type: MediaType,
}

impl ContextTarget {
    /// Target for a plain link
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            link_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// The URL carried directly by the click, link first
    pub fn direct_url(&self) -> Option<&str> {
        [&self.link_url, &self.src_url]
            .into_iter()
            .flatten()
            .map(|u| u.trim())
            .find(|u| !u.is_empty())
    }
}

/// User-facing outcome report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Always "SynoSend"
    pub title: String,
    /// Text shown to the user
    pub message: String,
}

impl Notification {
    /// Notification with the standard title
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            message: message.into(),
        }
    }
}
