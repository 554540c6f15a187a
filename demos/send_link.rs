//! Send a link to Download Station
//!
//! This example demonstrates the core functionality of synosend:
//! - Saving NAS settings (the password is stored encrypted)
//! - Testing the connection before the first submission
//! - Sending a link and reading the resulting notification
//!
//! Usage:
//!
//! ```text
//! SYNO_URL=https://nas.local:5001 SYNO_USER=admin SYNO_PASSWORD=secret \
//!     cargo run --example send_link -- https://example.com/file.iso
//! ```

use std::sync::Arc;
use synosend::{BroadcastNotifier, Config, ContextTarget, HttpConfig, Settings, SynoSend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let link = std::env::args()
        .nth(1)
        .ok_or("usage: send_link <url>")?;
    let nas_url = std::env::var("SYNO_URL")?;
    let username = std::env::var("SYNO_USER")?;
    let password = std::env::var("SYNO_PASSWORD")?;
    let location = std::env::var("SYNO_DESTINATION").unwrap_or_default();

    let config = Config {
        database_path: "demo-synosend.db".into(),
        http: HttpConfig {
            // DSM ships with a self-signed certificate
            accept_invalid_certs: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let notifier = Arc::new(BroadcastNotifier::default());
    let mut notifications = notifier.subscribe();
    let sender = SynoSend::open(config, notifier).await?;

    let test = sender
        .test_connection(&nas_url, &username, &password)
        .await?;
    if !test.success {
        println!(
            "✗ Connection test failed (code {}): {}",
            test.error_code.as_deref().unwrap_or("-"),
            test.error.as_deref().unwrap_or("unknown error")
        );
        return Ok(());
    }
    println!("✓ Connected in {:?}", test.latency.unwrap_or_default());

    sender
        .save_settings(&Settings::new(nas_url, username, password, location))
        .await?;

    let report = sender.send(&ContextTarget::link(link)).await;
    println!("Stages: {:?}", report.transitions);

    let notification = notifications.recv().await?;
    println!("{}: {}", notification.title, notification.message);

    Ok(())
}
