//! Scripted [`HttpClient`] for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Outcome a [`MockClient`] produces for every request.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    /// Answer with this status code.
    Status(u16),
    /// Fail as if the connection was refused.
    Refused,
    /// Fail with a timeout.
    Timeout,
}

/// Mock HTTP client that records requests and answers with a fixed outcome.
#[derive(Debug)]
pub struct MockClient {
    outcome: Outcome,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn ok() -> Self {
        Self::new(Outcome::Status(200))
    }

    pub fn status(code: u16) -> Self {
        Self::new(Outcome::Status(code))
    }

    pub fn refused() -> Self {
        Self::new(Outcome::Refused)
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);

        match self.outcome {
            Outcome::Status(code) => Ok(HttpResponse::with_status(
                http::StatusCode::from_u16(code).unwrap(),
            )),
            Outcome::Refused => Err(HttpError::Connection(
                std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into(),
            )),
            Outcome::Timeout => Err(HttpError::Timeout),
        }
    }
}
