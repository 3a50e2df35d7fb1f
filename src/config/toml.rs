//! TOML configuration file parsing.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All values are optional so the file can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// AlertManager service section
    #[serde(default)]
    pub alertmanager: AlertManagerSection,
}

/// `[alertmanager]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct AlertManagerSection {
    /// Whether the service is enabled
    #[serde(default)]
    pub enabled: bool,

    /// AlertManager endpoint URL
    pub url: Option<String>,

    /// Folder receiving payloads that could not be delivered
    pub retry_folder: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# alertmanager-relay configuration

[alertmanager]
# Forward alerts only when enabled (default: false)
enabled = false

# AlertManager endpoint receiving the alert array (required when enabled)
# url = "http://localhost:9093/api/v1/alerts"

# Existing folder receiving payloads that could not be delivered.
# Checked even while the service is disabled. "~/" expands to the home directory.
# retry-folder = "/var/spool/alertmanager-relay"
"#
    .to_string()
}
