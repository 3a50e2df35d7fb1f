//! Outbound HTTP plumbing.
//!
//! The dispatcher talks to the endpoint through the [`HttpClient`] trait so
//! tests can script responses and failures without a network. [`ReqwestClient`]
//! is the production implementation.

mod client;
mod error;
mod request;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
pub mod mock;

pub use client::ReqwestClient;
pub use error::HttpError;
pub use request::{HttpClient, HttpRequest, HttpResponse};
