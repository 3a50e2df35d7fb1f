//! Process-level glue for the `alertmanager-relay` binary.
//!
//! The exit status tells a calling script which side failed:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Command finished; for `test` and `send` the endpoint answered 200 |
//! | 1 | Configuration could not be loaded or validated, or `init` could not write |
//! | 2 | Configuration was fine but the alert was not delivered |
//!
//! A code 2 caused by an unreachable endpoint means the payload was staged in
//! the retry folder; a rejected alert (non-200) was not.

use alertmanager_relay::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

/// Exit codes of the binary.
pub mod exit_code {
    use std::process::ExitCode;

    /// Command succeeded.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Bad or missing configuration file, invalid URL, or missing retry folder.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Delivery failed, or the event given to `send` could not be read.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

const INIT_HINT: &str = "Run 'alertmanager-relay init' to generate a configuration template.";
const RETRY_FOLDER_HINT: &str = "Create the folder or point --retry-folder at an existing one.";

/// Returns the follow-up advice for a configuration error, if there is one.
pub fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::URL => Some(INIT_HINT),
        ConfigError::FileRead { .. } => Some(INIT_HINT),
        ConfigError::RetryFolderMissing { .. } => Some(RETRY_FOLDER_HINT),
        _ => None,
    }
}

/// Prints the advice from [`config_hint`] to stderr.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Installs the fmt subscriber: `INFO`, or `DEBUG` with `--verbose`.
/// `RUST_LOG` overrides both.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
