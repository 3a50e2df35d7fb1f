//! Framework-facing adapter around the dispatcher.
//!
//! The alerting framework invokes handlers without waiting for a verdict, so
//! [`AlertManagerHandler::handle`] never returns an error: a failed delivery
//! ends up as an `error` log line carrying the handler's context, and the
//! retry folder (for transport failures) is the only other trace of it.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::event::AlertEvent;
use crate::service::AlertManagerService;
use crate::spool::RetryStore;
use crate::transport::HttpClient;

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;

/// Per-handler target, overriding the service defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HandlerConfig {
    /// AlertManager endpoint
    pub url: String,
    /// Folder for undeliverable payloads
    pub retry_folder: PathBuf,
}

/// Options accepted by the self-test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TestOptions {
    /// Endpoint to test
    pub url: String,
    /// Folder for the payload if the endpoint is unreachable
    pub retry_folder: PathBuf,
    /// Accepted for compatibility; the test payload does not include it
    pub message: String,
}

/// Something the alerting framework can hand events to.
pub trait Handler: Send + Sync {
    /// Processes one event. Failures are handled internally.
    fn handle(&self, event: &AlertEvent) -> impl std::future::Future<Output = ()> + Send;
}

/// Handler delivering events to one AlertManager target.
#[derive(Debug)]
pub struct AlertManagerHandler<H, R> {
    service: Arc<AlertManagerService<H, R>>,
    config: HandlerConfig,
    context: String,
}

impl<H, R> AlertManagerHandler<H, R> {
    /// Creates a handler. Usually obtained via [`AlertManagerService::handler`].
    #[must_use]
    pub fn new(
        service: Arc<AlertManagerService<H, R>>,
        config: HandlerConfig,
        context: &[(&str, &str)],
    ) -> Self {
        Self {
            service,
            config,
            context: format_context(context),
        }
    }

    /// Returns the handler's target.
    #[must_use]
    pub const fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Returns the diagnostic context as `key=value` pairs.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl<H: HttpClient, R: RetryStore> Handler for AlertManagerHandler<H, R> {
    /// Dispatches the event and logs, rather than returns, any failure.
    async fn handle(&self, event: &AlertEvent) {
        let result = self
            .service
            .alert(&self.config.url, &self.config.retry_folder, event)
            .await;

        if let Err(e) = result {
            tracing::error!(
                context = %self.context,
                "failed to handle event to AlertManager: {e}"
            );
        }
    }
}

fn format_context(context: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (key, value) in context {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{key}={value}");
    }
    out
}
