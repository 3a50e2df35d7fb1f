//! File-per-payload retry store.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::TryRngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

use super::{PersistError, RetryStore};

/// Permission bits of a retry file: owner read/write, group read, no world access.
pub const RETRY_FILE_MODE: u32 = 0o640;

/// Generates a random version-4 identifier for a retry file name.
///
/// Bytes come straight from the OS random source.
///
/// # Errors
///
/// Returns [`PersistError::IdGeneration`] if the OS random source fails.
pub fn new_retry_id() -> Result<Uuid, PersistError> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| PersistError::IdGeneration(e.to_string()))?;
    Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
}

/// Writes each payload to `<folder>/<uuid-v4>`.
///
/// Files are created exclusively, so an existing file is never overwritten.
/// No locking is done: names come from a 122-bit random space.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRetryStore;

impl FileRetryStore {
    /// Creates the store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_blocking(path: &Path, payload: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(RETRY_FILE_MODE);
        }

        let mut file = options.open(path)?;
        file.write_all(payload)?;
        file.sync_all()
    }
}

impl RetryStore for FileRetryStore {
    async fn persist(&self, folder: &Path, payload: &[u8]) -> Result<PathBuf, PersistError> {
        let path = folder.join(new_retry_id()?.to_string());
        let payload = payload.to_vec();

        let target = path.clone();
        let written = tokio::task::spawn_blocking(move || Self::write_blocking(&target, &payload))
            .await
            .unwrap_or_else(|e| Err(io::Error::other(e)));

        match written {
            Ok(()) => Ok(path),
            Err(source) => Err(PersistError::Write { path, source }),
        }
    }
}
