//! Retry folder persistence.
//!
//! When the endpoint cannot be reached, the request body is written to a
//! fresh file in the retry folder so that an external process can redeliver
//! it later. This module only produces those files; it never reads or
//! removes them.

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::{FileRetryStore, RETRY_FILE_MODE, new_retry_id};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while staging a payload for retry.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The OS random source failed, so no file name could be generated.
    #[error("Failed to generate retry file name: {0}")]
    IdGeneration(String),

    /// The retry file could not be created or written.
    #[error("Failed to write retry file '{}': {source}", path.display())]
    Write {
        /// Path of the file that was being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Destination for payloads that could not be delivered.
///
/// The folder is passed per call because every handler may stage into its
/// own retry folder.
pub trait RetryStore: Send + Sync {
    /// Stores `payload` under a new, unique name inside `folder`.
    ///
    /// Returns the path of the created file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if no name could be generated or the file
    /// could not be written.
    fn persist(
        &self,
        folder: &Path,
        payload: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf, PersistError>> + Send;
}

impl<T: RetryStore> RetryStore for std::sync::Arc<T> {
    async fn persist(&self, folder: &Path, payload: &[u8]) -> Result<PathBuf, PersistError> {
        (**self).persist(folder, payload).await
    }
}
