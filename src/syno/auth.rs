//! Login via `SYNO.API.Auth`.

use serde_json::Value;

use super::{API_AUTH, SynoClient, error_code};
use crate::types::{ApiEndpoint, Session};
use crate::{Error, Result};

/// Auth version used when discovery reports none
pub const DEFAULT_AUTH_VERSION: u32 = 7;

/// Human-readable meaning of a `SYNO.API.Auth` error code, for logs
pub fn describe_auth_error(code: i64) -> &'static str {
    match code {
        400 => "no such account or incorrect password",
        401 => "account disabled",
        402 => "permission denied",
        403 => "2-step verification code required",
        404 => "failed to authenticate 2-step verification code",
        406 => "2-step verification enforced for this account",
        407 => "IP address blocked",
        408 => "password expired and cannot be changed",
        409 => "password expired",
        410 => "password must be changed",
        _ => "unrecognized error",
    }
}

impl SynoClient {
    /// Log in and obtain a session id
    ///
    /// The password only ever travels in the request query string; it is not
    /// logged, and transport errors have the request URL stripped.
    pub async fn login(
        &self,
        endpoint: &ApiEndpoint,
        username: &str,
        password: &str,
        session_name: &str,
    ) -> Result<Session> {
        let value = self
            .login_response(endpoint, username, password, session_name)
            .await?;
        session_from_response(&value)
    }

    /// Send the login request and return the decoded response
    ///
    /// A body that is not JSON is an [`Error::Login`] without a code.
    pub(crate) async fn login_response(
        &self,
        endpoint: &ApiEndpoint,
        username: &str,
        password: &str,
        session_name: &str,
    ) -> Result<Value> {
        let version = endpoint.negotiated_version(DEFAULT_AUTH_VERSION).to_string();
        let request = self.http.get(self.webapi_url(&endpoint.path)).query(&[
            ("api", API_AUTH),
            ("version", version.as_str()),
            ("method", "login"),
            ("account", username),
            ("passwd", password),
            ("session", session_name),
            ("format", "sid"),
        ]);

        tracing::debug!(
            path = %endpoint.path,
            version = %version,
            account = %username,
            "logging in to Synology"
        );

        let body = self.fetch_text(request).await?;
        serde_json::from_str::<Value>(&body).map_err(|_| {
            tracing::error!(body_len = body.len(), "login response is not JSON");
            Error::Login { code: None }
        })
    }
}

/// Extract the session id from a login response
///
/// Requires a non-empty `data.sid`; a response that explicitly says
/// `"success": false` is rejected even if it carries one.
pub fn session_from_response(value: &Value) -> Result<Session> {
    let explicit_failure = value.get("success").and_then(Value::as_bool) == Some(false);
    let sid = value
        .get("data")
        .and_then(|data| data.get("sid"))
        .and_then(Value::as_str)
        .filter(|sid| !sid.is_empty());

    match sid {
        Some(sid) if !explicit_failure => Ok(Session::new(sid)),
        _ => {
            let code = error_code(value);
            match code {
                Some(code) => tracing::error!(
                    code,
                    reason = describe_auth_error(code),
                    "Synology login failed"
                ),
                None => tracing::error!("Synology login failed: no session id in response"),
            }
            Err(Error::Login { code })
        }
    }
}
