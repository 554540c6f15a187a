//! Destination folder normalization.

/// Folder used when none is configured
pub const DEFAULT_DESTINATION: &str = "Downloads";

/// Normalize a configured download location
///
/// Surrounding whitespace is dropped, a blank or missing value becomes
/// [`DEFAULT_DESTINATION`], and trailing `/` are stripped unless nothing else
/// is left, in which case the result is `/`. Idempotent.
pub fn resolve(configured: Option<&str>) -> String {
    let trimmed = configured.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_DESTINATION.to_string();
    }

    match trimmed.trim_end_matches('/') {
        "" => "/".to_string(),
        folder => folder.to_string(),
    }
}
