//! Resolving the URL to send from a context-menu click.

use async_trait::async_trait;

use crate::types::ContextTarget;
use crate::{Error, Result};

/// Looks up the source currently playing in the page
///
/// Consulted only for video and audio clicks that carried no URL, e.g. players
/// fed from a `<source>` child or set up by script.
#[async_trait]
pub trait MediaSourceProbe: Send + Sync {
    /// `currentSrc` of the first video or audio element, if any
    async fn current_media_source(&self) -> Option<String>;
}

/// Probe that never finds anything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMediaProbe;

#[async_trait]
impl MediaSourceProbe for NoMediaProbe {
    async fn current_media_source(&self) -> Option<String> {
        None
    }
}

/// Pick the URL to submit: link, else element source, else the media probe
pub async fn resolve_target_url(
    target: &ContextTarget,
    probe: &dyn MediaSourceProbe,
) -> Result<String> {
    if let Some(url) = target.direct_url() {
        return Ok(url.to_string());
    }

    if target.media_type.is_playable() {
        match probe.current_media_source().await {
            Some(url) if !url.trim().is_empty() => {
                tracing::debug!(media_type = ?target.media_type, "using probed media source");
                return Ok(url.trim().to_string());
            }
            _ => tracing::debug!(media_type = ?target.media_type, "media probe found no source"),
        }
    }

    tracing::warn!("no valid URL found in context");
    Err(Error::NoTargetUrl)
}
