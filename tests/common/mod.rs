//! Common test utilities for synosend integration tests
//!
//! [`FakeNas`] is a wiremock server answering the Synology web API the way a
//! DSM 7 box with Download Station installed does.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Arc;
use synosend::{BroadcastNotifier, Config, Notification, Settings, SynoSend};
use tempfile::TempDir;
use tokio::sync::broadcast;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "correct horse battery staple";
pub const SID: &str = "abc123";

/// Matches a field of a form-encoded request body
pub struct FormParam {
    key: &'static str,
    value: String,
}

impl Match for FormParam {
    fn matches(&self, request: &Request) -> bool {
        url::form_urlencoded::parse(&request.body).any(|(k, v)| k == self.key && v == self.value)
    }
}

/// Form body field `key` equals `value`
pub fn form_param(key: &'static str, value: impl Into<String>) -> FormParam {
    FormParam {
        key,
        value: value.into(),
    }
}

/// Mock Synology NAS
pub struct FakeNas {
    pub server: MockServer,
}

impl FakeNas {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// API info listing Auth at `auth.cgi` v7 and Task at `entry.cgi` v2
    pub async fn with_discovery(self) -> Self {
        Mock::given(method("GET"))
            .and(path("/webapi/query.cgi"))
            .and(query_param("api", "SYNO.API.Info"))
            .and(query_param("method", "query"))
            .and(query_param("query", "SYNO.API.Auth,SYNO.DownloadStation2.Task"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "SYNO.API.Auth": {"path": "auth.cgi", "minVersion": 1, "maxVersion": 7},
                    "SYNO.DownloadStation2.Task": {
                        "path": "entry.cgi",
                        "minVersion": 1,
                        "maxVersion": 2,
                        "requestFormat": "JSON"
                    }
                }
            })))
            .expect(1)
            .mount(&self.server)
            .await;
        self
    }

    /// Login accepting [`USERNAME`] / [`PASSWORD`] and returning [`SID`]
    pub async fn with_login(self) -> Self {
        Mock::given(method("GET"))
            .and(path("/webapi/auth.cgi"))
            .and(query_param("api", "SYNO.API.Auth"))
            .and(query_param("version", "7"))
            .and(query_param("method", "login"))
            .and(query_param("account", USERNAME))
            .and(query_param("passwd", PASSWORD))
            .and(query_param("session", "DownloadStation"))
            .and(query_param("format", "sid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"sid": SID, "did": "device-token"}
            })))
            .expect(1)
            .mount(&self.server)
            .await;
        self
    }

    /// Login rejecting every account with vendor `code`
    pub async fn with_login_rejected(self, code: i64) -> Self {
        Mock::given(method("GET"))
            .and(path("/webapi/auth.cgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": {"code": code}
            })))
            .mount(&self.server)
            .await;
        self
    }

    /// Task creation for `url` into `destination`, answering with `response`
    pub async fn with_task(self, url: &str, destination: &str, response: Value) -> Self {
        Mock::given(method("POST"))
            .and(path("/webapi/entry.cgi"))
            .and(form_param("api", "SYNO.DownloadStation2.Task"))
            .and(form_param("version", "2"))
            .and(form_param("method", "create"))
            .and(form_param("url", json!([url]).to_string()))
            .and(form_param("_sid", SID))
            .and(form_param("type", "url"))
            .and(form_param("destination", Value::from(destination).to_string()))
            .and(form_param("create_list", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
        self
    }

    /// Fail the test if any task is created
    pub async fn expect_no_task(self) -> Self {
        Mock::given(method("POST"))
            .and(path("/webapi/entry.cgi"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
        self
    }
}

/// Sender backed by a SQLite file in a fresh temporary directory
///
/// Returns the sender, a subscription to its notifications, and the temp
/// directory, which must outlive the sender.
pub async fn create_test_sender(
    config: Config,
) -> (SynoSend, broadcast::Receiver<Notification>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        database_path: temp_dir.path().join("synosend.db"),
        ..config
    };

    let notifier = Arc::new(BroadcastNotifier::new(8));
    let notifications = notifier.subscribe();
    let sender = SynoSend::open(config, notifier).await.unwrap();

    (sender, notifications, temp_dir)
}

/// Settings pointing at `nas_url` with the fake NAS credentials
pub fn settings_for(nas_url: &str, download_location: &str) -> Settings {
    Settings::new(nas_url, USERNAME, PASSWORD, download_location)
}
