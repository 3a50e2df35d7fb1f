//! [`HttpClient`] backed by reqwest.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Production client.
///
/// Uses reqwest's defaults: connection pooling, system proxy settings, and
/// no request timeout. Deadlines are the caller's business; build a custom
/// `reqwest::Client` and pass it to [`ReqwestClient::from_client`] if one is
/// needed.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already configured reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        // A failure while draining the body still means the request was
        // answered; keep the status and drop what could not be read.
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::debug!("Failed to read response body: {e}");
                Vec::new()
            }
        };

        Ok(HttpResponse::new(status, body))
    }
}

fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}
