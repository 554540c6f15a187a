//! # synosend
//!
//! Send links and media URLs to a Synology Download Station.
//!
//! ## Design Philosophy
//!
//! synosend is designed to be:
//! - **Library-first** - No CLI or UI; the context menu, notification display
//!   and options page plug in through small traits
//! - **Safe at rest** - The NAS password is stored AES-256-GCM encrypted under a
//!   lazily created key
//! - **Discovery-driven** - API paths and versions are asked from the NAS on
//!   every submission instead of being hard-coded
//! - **Explicit** - Each submission is a forward-only state machine whose report
//!   says which stage failed and why
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use synosend::{BroadcastNotifier, Config, ContextTarget, Settings, SynoSend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let notifier = Arc::new(BroadcastNotifier::default());
//!     let mut notifications = notifier.subscribe();
//!
//!     let sender = SynoSend::open(Config::default(), notifier).await?;
//!     sender
//!         .save_settings(&Settings::new(
//!             "https://nas.local:5001",
//!             "admin",
//!             "secret",
//!             "Downloads",
//!         ))
//!         .await?;
//!
//!     let report = sender
//!         .send(&ContextTarget::link("https://example.com/file.iso"))
//!         .await;
//!     println!("{:?}", report.outcome);
//!
//!     if let Ok(notification) = notifications.recv().await {
//!         println!("{}: {}", notification.title, notification.message);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Credential encryption
pub mod crypto;
/// Destination folder normalization
pub mod destination;
/// Error types
pub mod error;
/// Notification delivery
pub mod notify;
/// Submission orchestration and options-page operations
pub mod sender;
/// Settings persistence
pub mod store;
/// Synology web API client
pub mod syno;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{Config, HttpConfig};
pub use crypto::{CredentialCipher, KeyStore, SealedSecret};
pub use error::{Error, Result, StoreError, ToNotification};
pub use notify::{BroadcastNotifier, LogNotifier, Notifier};
pub use sender::state::{SendOutcome, SendReport, Stage};
pub use sender::target::{MediaSourceProbe, NoMediaProbe};
pub use sender::{ConnectionTestResult, Settings, SynoSend};
pub use store::{MemoryStore, SettingsStore, SqliteStore};
pub use syno::SynoClient;
pub use types::{ContextTarget, MediaType, Notification, Outcome};
