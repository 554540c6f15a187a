//! Submission orchestration.
//!
//! [`SynoSend`] ties the steps of one submission together and exposes the
//! options-page operations:
//! - [`state`] - stages, outcomes and the per-run report
//! - [`target`] - link and media URL resolution
//! - [`settings`] - save, load and connection test

mod settings;
pub mod state;
pub mod target;


pub use settings::{ConnectionTestResult, Settings};

use std::sync::Arc;

use crate::config::Config;
use crate::crypto::{CredentialCipher, KeyStore};
use crate::destination;
use crate::error::{Error, Result, ToNotification};
use crate::notify::Notifier;
use crate::store::{SettingsStore, SqliteStore, keys};
use crate::syno::{SynoClient, interpret};
use crate::types::{ApiEndpoint, ContextTarget, DownloadTask, Outcome, Session};

use state::{Run, SendOutcome, SendReport, Stage};
use target::{MediaSourceProbe, NoMediaProbe};

/// Sends URLs to a Synology Download Station
///
/// One instance serves any number of sequential or concurrent [`send`](Self::send)
/// calls; runs share only the settings store and the cached encryption key.
#[derive(Clone)]
pub struct SynoSend {
    config: Arc<Config>,
    store: Arc<dyn SettingsStore>,
    cipher: CredentialCipher,
    http: reqwest::Client,
    notifier: Arc<dyn Notifier>,
    media_probe: Arc<dyn MediaSourceProbe>,
}

impl SynoSend {
    /// Create a sender on top of an existing settings store
    pub fn new(
        config: Config,
        store: Arc<dyn SettingsStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let http = config.http.build_client()?;
        let keys = Arc::new(KeyStore::new(store.clone()));

        Ok(Self {
            config: Arc::new(config),
            cipher: CredentialCipher::new(keys),
            store,
            http,
            notifier,
            media_probe: Arc::new(NoMediaProbe),
        })
    }

    /// Open the SQLite settings database named in `config` and create a sender
    pub async fn open(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let store = SqliteStore::open(&config.database_path).await?;
        tracing::info!(path = %config.database_path.display(), "opened settings database");
        Self::new(config, Arc::new(store), notifier)
    }

    /// Use `probe` to find the playing source of video and audio clicks
    pub fn with_media_probe(mut self, probe: Arc<dyn MediaSourceProbe>) -> Self {
        self.media_probe = probe;
        self
    }

    /// Send the clicked link or media URL to the NAS
    ///
    /// Never fails: the result, including the stage a failure happened in, is
    /// in the returned report, and exactly one notification is delivered.
    pub async fn send(&self, target: &ContextTarget) -> SendReport {
        let mut run = Run::new();

        let outcome = match self.run_steps(target, &mut run).await {
            Ok(()) => SendOutcome::Succeeded,
            Err(error) => {
                let stage = run.stage();
                tracing::error!(
                    stage = %stage,
                    error_code = error.error_code(),
                    error = %error,
                    "failed to send task to Synology"
                );
                SendOutcome::Failed { stage, error }
            }
        };

        let report = run.finish(outcome);
        self.notifier.notify(report.notification.clone());
        report
    }

    async fn run_steps(&self, target: &ContextTarget, run: &mut Run) -> Result<()> {
        let url = target::resolve_target_url(target, self.media_probe.as_ref()).await?;
        tracing::info!(url = %url, "sending to Synology");

        run.enter(Stage::LoadingCredentials);
        let credential = self.load_credential().await?;
        let client = SynoClient::new(self.http.clone(), &credential.nas_host)?;
        let password = self.cipher.decrypt(&credential.password).await?;

        run.enter(Stage::Discovering);
        let endpoints = client.discover().await?;

        run.enter(Stage::Authenticating);
        let session = client
            .login(
                &endpoints.auth,
                &credential.username,
                &password,
                &self.config.session_name,
            )
            .await?;
        drop(password);

        if self.config.probe_download_station_info {
            probe_info(&client, &endpoints.task, &session).await;
        }

        run.enter(Stage::ResolvingDestination);
        let configured = self.store.get(keys::DOWNLOAD_LOCATION).await?;
        let destination = destination::resolve(configured.as_deref());
        tracing::debug!(destination = %destination, "resolved destination folder");

        run.enter(Stage::Submitting);
        let task = DownloadTask {
            url: &url,
            destination: &destination,
            session: &session,
        };
        let raw = client.submit_task(&endpoints.task, &task).await?;

        match interpret(&raw) {
            Outcome::Success => {
                tracing::info!(url = %url, destination = %destination, "task sent to Synology");
                Ok(())
            }
            Outcome::Failure { code, message } => {
                tracing::error!(code = %code, message = %message, response = %raw, "Synology rejected the task");
                Err(Error::TaskFailure { code, message })
            }
        }
    }
}

/// Log Download Station info; failures are logged and otherwise ignored
async fn probe_info(client: &SynoClient, task_endpoint: &ApiEndpoint, session: &Session) {
    match client.fetch_info(task_endpoint, session).await {
        Ok(info) => tracing::debug!(response = %info, "Download Station info"),
        Err(e) => tracing::warn!(error = %e, "failed to fetch Download Station info"),
    }
}
