//! API discovery via `SYNO.API.Info`.

use serde_json::Value;

use super::{API_AUTH, API_INFO, API_TASK, SynoClient, error_code, is_success};
use crate::types::{ApiEndpoint, ApiEndpoints};
use crate::{Error, Result};

/// Path of the API info CGI, fixed on every DSM version
pub const QUERY_PATH: &str = "query.cgi";

impl SynoClient {
    /// Discover the paths and versions of the Auth and Task APIs
    ///
    /// One `GET query.cgi` request asks for exactly those two families.
    /// Fails with [`Error::Discovery`] when the body is not JSON, the NAS
    /// reports failure, or either family is missing.
    pub async fn discover(&self) -> Result<ApiEndpoints> {
        let query = format!("{API_AUTH},{API_TASK}");
        let request = self.http.get(self.webapi_url(QUERY_PATH)).query(&[
            ("api", API_INFO),
            ("version", "1"),
            ("method", "query"),
            ("query", query.as_str()),
        ]);

        let body = self.fetch_text(request).await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, "API info response is not JSON");
            Error::Discovery(format!("response is not valid JSON: {e}"))
        })?;

        parse_endpoints(&value)
    }
}

/// Extract the Auth and Task descriptors from an API info response
pub fn parse_endpoints(value: &Value) -> Result<ApiEndpoints> {
    if !is_success(value) {
        return Err(Error::Discovery(match error_code(value) {
            Some(code) => format!("NAS reported failure (code {code})"),
            None => "NAS reported failure".to_string(),
        }));
    }

    let endpoints = ApiEndpoints {
        auth: endpoint(value, API_AUTH)?,
        task: endpoint(value, API_TASK)?,
    };

    tracing::debug!(
        auth_path = %endpoints.auth.path,
        auth_version = ?endpoints.auth.max_version,
        task_path = %endpoints.task.path,
        task_version = ?endpoints.task.max_version,
        "discovered Synology API endpoints"
    );

    Ok(endpoints)
}

fn endpoint(value: &Value, name: &str) -> Result<ApiEndpoint> {
    let raw = value
        .get("data")
        .and_then(|data| data.get(name))
        .filter(|v| !v.is_null())
        .ok_or_else(|| Error::Discovery(format!("missing API info for {name}")))?;

    let mut endpoint: ApiEndpoint = serde_json::from_value(raw.clone())
        .map_err(|e| Error::Discovery(format!("malformed API info for {name}: {e}")))?;

    if endpoint.path.trim().is_empty() {
        return Err(Error::Discovery(format!("empty path for {name}")));
    }

    endpoint.name = name.to_string();
    Ok(endpoint)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_both_families() {
        let value = json!({
            "success": true,
            "data": {
                "SYNO.API.Auth": {"path": "auth.cgi", "minVersion": 1, "maxVersion": 7},
                "SYNO.DownloadStation2.Task": {"path": "entry.cgi", "minVersion": 1, "maxVersion": 2}
            }
        });

        let endpoints = parse_endpoints(&value).unwrap();
        assert_eq!(endpoints.auth.name, API_AUTH);
        assert_eq!(endpoints.auth.path, "auth.cgi");
        assert_eq!(endpoints.auth.negotiated_version(7), 7);
        assert_eq!(endpoints.task.name, API_TASK);
        assert_eq!(endpoints.task.path, "entry.cgi");
        assert_eq!(endpoints.task.negotiated_version(2), 2);
    }

    #[test]
    fn missing_auth_family_is_discovery_error() {
        let value = json!({
            "success": true,
            "data": {
                "SYNO.DownloadStation2.Task": {"path": "entry.cgi", "maxVersion": 2}
            }
        });

        let err = parse_endpoints(&value).unwrap_err();
        assert!(matches!(err, Error::Discovery(ref m) if m.contains(API_AUTH)), "got {err:?}");
    }

    #[test]
    fn missing_task_family_is_discovery_error() {
        let value = json!({
            "success": true,
            "data": {"SYNO.API.Auth": {"path": "auth.cgi", "maxVersion": 7}}
        });

        let err = parse_endpoints(&value).unwrap_err();
        assert!(matches!(err, Error::Discovery(ref m) if m.contains(API_TASK)), "got {err:?}");
    }

    #[test]
    fn success_false_is_discovery_error() {
        let value = json!({"success": false, "error": {"code": 102}});
        let err = parse_endpoints(&value).unwrap_err();
        assert!(matches!(err, Error::Discovery(ref m) if m.contains("102")), "got {err:?}");
    }

    #[test]
    fn missing_success_flag_or_data_is_discovery_error() {
        assert!(matches!(
            parse_endpoints(&json!({"data": {}})).unwrap_err(),
            Error::Discovery(_)
        ));
        assert!(matches!(
            parse_endpoints(&json!({"success": true})).unwrap_err(),
            Error::Discovery(_)
        ));
        assert!(matches!(
            parse_endpoints(&json!([1, 2, 3])).unwrap_err(),
            Error::Discovery(_)
        ));
    }

    #[test]
    fn descriptor_without_path_is_discovery_error() {
        let value = json!({
            "success": true,
            "data": {
                "SYNO.API.Auth": {"maxVersion": 7},
                "SYNO.DownloadStation2.Task": {"path": "entry.cgi"}
            }
        });
        assert!(matches!(
            parse_endpoints(&value).unwrap_err(),
            Error::Discovery(_)
        ));
    }
}
