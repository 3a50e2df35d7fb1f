//! AlertManager dispatcher.
//!
//! [`AlertManagerService`] owns the hot-reloadable [`ServiceConfig`], the HTTP
//! client, and the retry store. [`AlertManagerService::alert`] is the single
//! delivery path used by handlers, the self-test, and the binary.
//!
//! # Outcome classification
//!
//! | Outcome                         | Result                         | Retry file |
//! |---------------------------------|--------------------------------|------------|
//! | service disabled                | [`DispatchError::Disabled`]    | no         |
//! | event cannot be translated      | [`DispatchError::Translate`]   | no         |
//! | no response (refused, DNS, ...) | [`DispatchError::Transport`]   | yes        |
//! | response other than 200         | [`DispatchError::UnexpectedStatus`] | no    |
//! | 200                             | `Ok(())`                       | no         |

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use http::StatusCode;
use thiserror::Error;
use url::Url;

use crate::config::{ConfigError, ServiceConfig, defaults};
use crate::event::AlertEvent;
use crate::handler::{AlertManagerHandler, HandlerConfig, TestOptions};
use crate::spool::{FileRetryStore, RetryStore};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::wire::{TranslateError, encode_payload, translate};

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

/// Error returned by [`AlertManagerService::alert`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The service is disabled; nothing was sent or written.
    #[error("service is not enabled")]
    Disabled,

    /// The event cannot be expressed in the wire format.
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// The wire event could not be serialized.
    #[error("Failed to encode alert payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// The endpoint could not be reached; the payload was staged for retry.
    #[error("Failed to post alert to AlertManager: {0}")]
    Transport(#[source] HttpError),

    /// The endpoint answered with a status other than 200.
    #[error("unexpected response code {} from AlertManager service", status.as_u16())]
    UnexpectedStatus {
        /// Status code received
        status: StatusCode,
    },
}

impl DispatchError {
    /// Returns true if the payload was handed to the retry store.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Error returned by [`AlertManagerService::update`].
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Hot-reload expects exactly one configuration object.
    #[error("expected only one new config object, got {0}")]
    WrongCount(usize),

    /// The replacement configuration failed validation.
    #[error("invalid AlertManager configuration: {0}")]
    Invalid(#[source] ConfigError),
}

/// Forwards alert events to AlertManager.
///
/// Safe to share between tasks (`Arc<AlertManagerService<..>>`); each call
/// works on its own snapshot of the configuration.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `R`: The retry store (defaults to [`FileRetryStore`])
///
/// # Example
///
/// ```
/// use alertmanager_relay::config::ServiceConfig;
/// use alertmanager_relay::service::AlertManagerService;
/// use alertmanager_relay::transport::ReqwestClient;
///
/// let service = AlertManagerService::new(
///     ServiceConfig::new(true, "http://localhost:9093/api/v1/alerts", "/var/spool/alerts"),
///     ReqwestClient::new(),
/// );
/// assert!(service.config().enabled);
/// ```
#[derive(Debug)]
pub struct AlertManagerService<H, R = FileRetryStore> {
    config: ArcSwap<ServiceConfig>,
    client: H,
    store: R,
}

impl<H> AlertManagerService<H, FileRetryStore> {
    /// Creates a service that stages failed payloads as files.
    ///
    /// The configuration is stored as given; validate it first.
    #[must_use]
    pub fn new(config: ServiceConfig, client: H) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            client,
            store: FileRetryStore::new(),
        }
    }
}

impl<H, R> AlertManagerService<H, R> {
    /// Replaces the retry store.
    #[must_use]
    pub fn with_store<R2>(self, store: R2) -> AlertManagerService<H, R2> {
        AlertManagerService {
            config: self.config,
            client: self.client,
            store,
        }
    }

    /// Returns a snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> Arc<ServiceConfig> {
        self.config.load_full()
    }

    /// Replaces the configuration (hot-reload).
    ///
    /// Exactly one configuration object must be supplied. It is validated
    /// and then stored in one step; calls already running keep the snapshot
    /// they started with.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::WrongCount`] if `configs` does not hold exactly
    /// one element, or [`UpdateError::Invalid`] if it fails validation.
    pub fn update(&self, configs: Vec<ServiceConfig>) -> Result<(), UpdateError> {
        let count = configs.len();
        let [config]: [ServiceConfig; 1] = configs
            .try_into()
            .map_err(|_| UpdateError::WrongCount(count))?;

        config.validate().map_err(UpdateError::Invalid)?;

        tracing::info!(
            enabled = config.enabled,
            url = %config.url,
            "AlertManager configuration updated"
        );
        self.config.store(Arc::new(config));
        Ok(())
    }

    /// Handler configuration seeded from the current service configuration.
    #[must_use]
    pub fn default_handler_config(&self) -> HandlerConfig {
        let config = self.config();
        HandlerConfig {
            url: config.url.clone(),
            retry_folder: config.retry_folder.clone(),
        }
    }

    /// Self-test options seeded from the current service configuration.
    #[must_use]
    pub fn test_options(&self) -> TestOptions {
        let config = self.config();
        TestOptions {
            url: config.url.clone(),
            retry_folder: config.retry_folder.clone(),
            message: defaults::TEST_MESSAGE.to_string(),
        }
    }

    /// Creates a handler bound to `config`.
    ///
    /// `context` is attached to every error the handler logs.
    #[must_use]
    pub fn handler(
        self: &Arc<Self>,
        config: HandlerConfig,
        context: &[(&str, &str)],
    ) -> AlertManagerHandler<H, R> {
        AlertManagerHandler::new(Arc::clone(self), config, context)
    }
}

impl<H: HttpClient, R: RetryStore> AlertManagerService<H, R> {
    /// Sends one event to `url`.
    ///
    /// If no response is received, the encoded payload is written to
    /// `retry_folder`. A failure to write it is logged; the transport error
    /// is returned either way.
    ///
    /// # Errors
    ///
    /// See [`DispatchError`] for the outcome of each failure.
    pub async fn alert(
        &self,
        url: &str,
        retry_folder: &Path,
        event: &AlertEvent,
    ) -> Result<(), DispatchError> {
        if !self.config().enabled {
            return Err(DispatchError::Disabled);
        }

        let wire = translate(event)?;
        let payload = encode_payload(&wire).map_err(DispatchError::Encode)?;

        let response = match self.post(url, payload.clone()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, "AlertManager unreachable: {e}");
                self.stage_for_retry(retry_folder, &payload).await;
                return Err(DispatchError::Transport(e));
            }
        };

        if response.status != StatusCode::OK {
            tracing::debug!(
                url,
                status = response.status.as_u16(),
                body = response.body_text().unwrap_or_default(),
                "AlertManager rejected alert"
            );
            return Err(DispatchError::UnexpectedStatus {
                status: response.status,
            });
        }

        tracing::debug!(url, topic = %event.topic, "Alert delivered");
        Ok(())
    }

    /// Sends the synthetic self-test event to `options.url`.
    ///
    /// The event is zero-valued; `options.message` is not sent.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AlertManagerService::alert`] returns.
    pub async fn test(&self, options: &TestOptions) -> Result<(), DispatchError> {
        self.alert(&options.url, &options.retry_folder, &AlertEvent::default())
            .await
    }

    async fn post(&self, url: &str, payload: Vec<u8>) -> Result<HttpResponse, HttpError> {
        let target = Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{url}: {e}")))?;
        self.client
            .request(HttpRequest::post_json(target, payload))
            .await
    }

    async fn stage_for_retry(&self, retry_folder: &Path, payload: &[u8]) {
        match self.store.persist(retry_folder, payload).await {
            Ok(path) => {
                tracing::debug!("Alert saved for retry: {}", path.display());
            }
            Err(e) => {
                tracing::error!("Couldn't save alert for retry: {e}");
            }
        }
    }
}
