//! Runtime configuration of the AlertManager service.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::{ConfigError, field};

/// Configuration the dispatcher reads on every call.
///
/// Values are kept as configured (URL as text) so that a snapshot can be
/// handed around and compared as-is; [`ServiceConfig::validate`] is the gate
/// that decides whether it may be used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServiceConfig {
    /// Whether alerts are forwarded at all
    pub enabled: bool,
    /// Default AlertManager endpoint
    pub url: String,
    /// Default folder for undeliverable payloads
    pub retry_folder: PathBuf,
}

impl ServiceConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(enabled: bool, url: impl Into<String>, retry_folder: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            url: url.into(),
            retry_folder: retry_folder.into(),
        }
    }

    /// Checks whether this configuration can be used.
    ///
    /// The URL is only checked when the service is enabled, and only
    /// syntactically. The retry folder must exist even when the service is
    /// disabled; a stat failure other than "not found" is not reported.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service is enabled and the URL is empty or does not parse
    /// - The retry folder does not exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled {
            if self.url.is_empty() {
                return Err(ConfigError::missing(
                    field::URL,
                    "Use --url or set alertmanager.url in config file",
                ));
            }
            Url::parse(&self.url).map_err(|e| ConfigError::InvalidUrl {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;
        }

        match std::fs::metadata(&self.retry_folder) {
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ConfigError::RetryFolderMissing {
                path: self.retry_folder.clone(),
                source: e,
            }),
            _ => Ok(()),
        }
    }
}
