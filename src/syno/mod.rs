//! Synology web API client
//!
//! Covers the handful of calls needed to hand a URL to Download Station:
//! - [`discovery`]: `SYNO.API.Info` query for the Auth and Task API paths/versions
//! - [`auth`]: `SYNO.API.Auth` login returning a session id
//! - [`task`]: `SYNO.DownloadStation2.Task` create
//! - [`info`]: optional `SYNO.DownloadStation.Info` probe, logged only
//! - [`response`]: classification of the create-task response

use serde_json::Value;
use url::Url;

use crate::{Error, Result};

pub mod auth;
pub mod discovery;
pub mod info;
pub mod response;
pub mod task;


pub use response::interpret;

/// API metadata query
pub const API_INFO: &str = "SYNO.API.Info";
/// Authentication API
pub const API_AUTH: &str = "SYNO.API.Auth";
/// Download Station task API
pub const API_TASK: &str = "SYNO.DownloadStation2.Task";
/// Download Station info API
pub const API_DS_INFO: &str = "SYNO.DownloadStation.Info";

/// Client for one NAS host
///
/// Cheap to clone; the underlying reqwest client is shared.
#[derive(Clone, Debug)]
pub struct SynoClient {
    http: reqwest::Client,
    base: String,
}

impl SynoClient {
    /// Create a client for `nas_host` (e.g. "https://nas.local:5001")
    ///
    /// The host must be an absolute http(s) URL without a query or fragment.
    /// A trailing `/` is dropped.
    pub fn new(http: reqwest::Client, nas_host: &str) -> Result<Self> {
        let trimmed = nas_host.trim();
        let invalid = |reason: String| Error::InvalidNasUrl {
            url: trimmed.to_string(),
            reason,
        };

        let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query or fragment not allowed".to_string()));
        }

        Ok(Self {
            http,
            base: trimmed.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL of a CGI path under `/webapi/`
    pub fn webapi_url(&self, path: &str) -> String {
        format!("{}/webapi/{}", self.base, path.trim_start_matches('/'))
    }

    /// Send a request and return its body as text
    async fn fetch_text(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request.send().await.map_err(Error::transport)?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = %status, "NAS answered with non-success HTTP status");
        }
        response.text().await.map_err(Error::transport)
    }
}

/// Parse a response body as JSON, keeping the raw body on failure
pub(crate) fn parse_body(body: String) -> Result<Value> {
    serde_json::from_str(&body).map_err(|e| Error::ResponseParse {
        reason: e.to_string(),
        body,
    })
}

/// `true` only when the response carries `"success": true`
pub(crate) fn is_success(value: &Value) -> bool {
    value.get("success").and_then(Value::as_bool) == Some(true)
}

/// Numeric vendor error code from `error.code`, if any
pub(crate) fn error_code(value: &Value) -> Option<i64> {
    value.get("error")?.get("code")?.as_i64()
}
