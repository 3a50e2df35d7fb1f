//! Tests for configuration error hints.

use std::path::PathBuf;

use alertmanager_relay::config::{ConfigError, field};

use super::config_hint;

fn io_not_found() -> std::io::Error {
    std::io::Error::from(std::io::ErrorKind::NotFound)
}

#[test]
fn missing_url_points_to_init() {
    let hint = config_hint(&ConfigError::missing(field::URL, "set --url")).unwrap();
    assert!(hint.contains("alertmanager-relay init"));
}

#[test]
fn unreadable_config_file_points_to_init() {
    let err = ConfigError::FileRead {
        path: PathBuf::from("alertmanager-relay.toml"),
        source: io_not_found(),
    };
    assert!(config_hint(&err).unwrap().contains("init"));
}

#[test]
fn missing_retry_folder_points_to_flag() {
    let err = ConfigError::RetryFolderMissing {
        path: PathBuf::from("/var/spool/alertmanager"),
        source: io_not_found(),
    };
    assert!(config_hint(&err).unwrap().contains("--retry-folder"));
}

#[test]
fn invalid_url_has_no_hint() {
    let err = ConfigError::InvalidUrl {
        url: "::".to_string(),
        reason: "relative URL without a base".to_string(),
    };
    assert_eq!(config_hint(&err), None);
}
