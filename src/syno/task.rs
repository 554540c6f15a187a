//! Download task creation via `SYNO.DownloadStation2.Task`.

use serde_json::{Value, json};

use super::{API_TASK, SynoClient, parse_body};
use crate::Result;
use crate::types::{ApiEndpoint, DownloadTask};

/// Task API version used when discovery reports none
pub const DEFAULT_TASK_VERSION: u32 = 2;

/// Form fields of a create-task request, in wire order
///
/// `url` is a one-element JSON list and `destination` a JSON string, as the
/// DownloadStation2 API expects.
pub fn create_task_form(version: u32, task: &DownloadTask<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("api", API_TASK.to_string()),
        ("version", version.to_string()),
        ("method", "create".to_string()),
        ("url", json!([task.url]).to_string()),
        ("_sid", task.session.sid().to_string()),
        ("type", "url".to_string()),
        ("destination", Value::from(task.destination).to_string()),
        ("create_list", "false".to_string()),
    ]
}

impl SynoClient {
    /// Submit a create-task request and return the parsed JSON body
    ///
    /// The request is a form-encoded POST; the session id travels in the body,
    /// never in the URL. A body that is not JSON yields
    /// [`Error::ResponseParse`](crate::Error::ResponseParse).
    pub async fn submit_task(&self, endpoint: &ApiEndpoint, task: &DownloadTask<'_>) -> Result<Value> {
        let version = endpoint.negotiated_version(DEFAULT_TASK_VERSION);
        let form = create_task_form(version, task);

        tracing::info!(
            url = %task.url,
            destination = %task.destination,
            path = %endpoint.path,
            version,
            "sending download task to Synology"
        );

        let request = self.http.post(self.webapi_url(&endpoint.path)).form(&form);
        let body = self.fetch_text(request).await?;

        parse_body(body).inspect_err(|e| {
            if let crate::Error::ResponseParse { body, .. } = e {
                tracing::error!(body = %body, "failed to parse Synology response as JSON");
            }
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Session;

    #[test]
    fn form_carries_every_field() {
        let session = Session::new("abc123");
        let task = DownloadTask {
            url: "https://example.com/file.iso",
            destination: "Downloads/isos",
            session: &session,
        };

        let form = create_task_form(2, &task);
        let keys: Vec<_> = form.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            ["api", "version", "method", "url", "_sid", "type", "destination", "create_list"]
        );

        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(get("api"), "SYNO.DownloadStation2.Task");
        assert_eq!(get("version"), "2");
        assert_eq!(get("method"), "create");
        assert_eq!(get("url"), r#"["https://example.com/file.iso"]"#);
        assert_eq!(get("_sid"), "abc123");
        assert_eq!(get("type"), "url");
        assert_eq!(get("destination"), r#""Downloads/isos""#);
        assert_eq!(get("create_list"), "false");
    }

    #[test]
    fn json_encoding_escapes_quotes() {
        let session = Session::new("s");
        let task = DownloadTask {
            url: r#"https://example.com/a"b"#,
            destination: r#"Media/"quoted""#,
            session: &session,
        };

        let form = create_task_form(2, &task);
        assert_eq!(form[3].1, r#"["https://example.com/a\"b"]"#);
        assert_eq!(form[6].1, r#""Media/\"quoted\"""#);
    }
}
