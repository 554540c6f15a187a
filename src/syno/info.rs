//! Download Station info probe (diagnostics only).

use serde_json::Value;

use super::{API_DS_INFO, SynoClient, parse_body};
use crate::Result;
use crate::types::{ApiEndpoint, Session};

/// CGI path of the legacy Download Station info API
pub const INFO_PATH: &str = "DownloadStation/info.cgi";

/// Info API version used when the task endpoint reports none
pub const DEFAULT_INFO_VERSION: u32 = 1;

impl SynoClient {
    /// Fetch Download Station info
    ///
    /// The version follows the task endpoint's negotiation; the path is always
    /// [`INFO_PATH`]. The result is for logging and never gates a submission.
    pub async fn fetch_info(&self, task_endpoint: &ApiEndpoint, session: &Session) -> Result<Value> {
        let version = task_endpoint
            .negotiated_version(DEFAULT_INFO_VERSION)
            .to_string();
        let request = self.http.get(self.webapi_url(INFO_PATH)).query(&[
            ("api", API_DS_INFO),
            ("version", version.as_str()),
            ("method", "getinfo"),
            ("_sid", session.sid()),
        ]);

        parse_body(self.fetch_text(request).await?)
    }
}
