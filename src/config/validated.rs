//! Validated configuration after merging CLI and TOML sources.

use std::fmt;
use std::path::{Path, PathBuf};

use super::ServiceConfig;
use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to merge CLI args with an optional TOML
/// config. The merged [`ServiceConfig`] is validated before it is returned.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Service configuration (passed [`ServiceConfig::validate`])
    pub service: ServiceConfig,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = if self.service.url.is_empty() {
            "none"
        } else {
            self.service.url.as_str()
        };

        write!(
            f,
            "Config {{ enabled: {}, url: {}, retry_folder: {} }}",
            self.service.enabled,
            url,
            self.service.retry_folder.display(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// Explicit CLI values take precedence over TOML values, which take
    /// precedence over built-in defaults. `--enable` can only switch the
    /// service on.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by [`ServiceConfig::validate`].
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let section = toml.map(|t| &t.alertmanager);

        let enabled = cli.enable || section.map_or(defaults::ENABLED, |s| s.enabled);

        let url = cli
            .url
            .clone()
            .or_else(|| section.and_then(|s| s.url.clone()))
            .unwrap_or_default();

        let retry_folder = cli
            .retry_folder
            .as_deref()
            .or_else(|| section.and_then(|s| s.retry_folder.as_deref()))
            .map(expand_home)
            .unwrap_or_default();

        let service = ServiceConfig {
            enabled,
            url,
            retry_folder,
        };
        service.validate()?;

        Ok(Self {
            service,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Expands a leading `~/` to the current user's home directory.
///
/// Paths are returned unchanged when there is no such prefix or no home
/// directory is known.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
