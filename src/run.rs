//! Command execution.
//!
//! Builds the service from validated configuration and runs one of the
//! one-shot commands against it.

use std::path::Path;

use thiserror::Error;
use tokio::io::AsyncReadExt;

use alertmanager_relay::config::{Command, ValidatedConfig};
use alertmanager_relay::event::AlertEvent;
use alertmanager_relay::service::{AlertManagerService, DispatchError};
use alertmanager_relay::transport::ReqwestClient;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Delivering the alert failed.
    #[error("AlertManager dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    /// The event file could not be read.
    #[error("Failed to read event from {source_name}: {source}")]
    EventRead {
        /// File path, or `stdin`
        source_name: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The event was not valid JSON for an alert event.
    #[error("Failed to parse event: {0}")]
    EventParse(#[source] serde_json::Error),
}

/// Executes a command.
///
/// # Errors
///
/// Returns an error if the event cannot be read or parsed, or if the
/// dispatch fails.
pub async fn execute(command: Command, config: ValidatedConfig) -> Result<(), RunError> {
    let service = AlertManagerService::new(config.service, ReqwestClient::new());

    match command {
        Command::Init { .. } | Command::Check => {
            tracing::info!("Configuration is valid");
            Ok(())
        }
        Command::Test { message } => {
            let mut options = service.test_options();
            if let Some(message) = message {
                options.message = message;
            }
            tracing::info!("Sending test alert to {}", options.url);
            service.test(&options).await?;
            tracing::info!("Test alert accepted");
            Ok(())
        }
        Command::Send { event } => {
            let event = read_event(event.as_deref()).await?;
            let target = service.default_handler_config();
            service
                .alert(&target.url, &target.retry_folder, &event)
                .await?;
            tracing::info!("Alert '{}' delivered", event.state.id);
            Ok(())
        }
    }
}

/// Reads one event from `path`, or from stdin when `path` is `None`.
async fn read_event(path: Option<&Path>) -> Result<AlertEvent, RunError> {
    let bytes = match path {
        Some(path) => tokio::fs::read(path)
            .await
            .map_err(|e| RunError::EventRead {
                source_name: path.display().to_string(),
                source: e,
            })?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .map_err(|e| RunError::EventRead {
                    source_name: "stdin".to_string(),
                    source: e,
                })?;
            buf
        }
    };

    parse_event(&bytes)
}

fn parse_event(bytes: &[u8]) -> Result<AlertEvent, RunError> {
    AlertEvent::from_json(bytes).map_err(RunError::EventParse)
}

