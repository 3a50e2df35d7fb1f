//! Transport-level failures.

use thiserror::Error;

/// A request that never produced a response.
///
/// Any of these means the payload did not reach the endpoint, which is what
/// makes it eligible for the retry folder.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connecting or exchanging data failed (refused, DNS, reset, ...).
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request timed out before a response arrived.
    #[error("Request timed out")]
    Timeout,

    /// The target URL could not be used to build a request.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
