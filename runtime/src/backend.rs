//! File-backed persistence.
//!
//! Each key maps to `<data_dir>/<key>.json`. Writes land in a temporary
//! sibling first and are renamed over the target, so a reader never sees a
//! half-written collection and a failed write leaves the old record intact.

use film_roll_core::{BackendFuture, StorageError, TripBackend};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Durable [`TripBackend`] storing one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the records
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `key`
    ///
    /// Keys are restricted to ASCII alphanumerics, `-` and `_` so they cannot
    /// escape the data directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] for an empty or unsafe key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::Unavailable(format!(
                "invalid storage key '{key}'"
            )));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }

    async fn write_atomically(&self, path: &Path, value: &[u8]) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = path.with_extension("json.tmp");
        let result = match Self::write_tmp(&tmp, value).await {
            Ok(()) => tokio::fs::rename(&tmp, path).await,
            Err(err) => Err(err),
        };

        if let Err(err) = result {
            Self::discard_tmp(&tmp).await;
            return Err(err.into());
        }

        Ok(())
    }

    async fn write_tmp(tmp: &Path, value: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(value).await?;
        file.sync_all().await
    }

    /// Remove a leftover temporary file; the record itself is untouched
    async fn discard_tmp(tmp: &Path) {
        match tokio::fs::remove_file(tmp).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %tmp.display(), error = %err, "Failed to remove temporary record");
            }
        }
    }
}

impl TripBackend for FileBackend {
    fn get<'a>(&'a self, key: &'a str) -> BackendFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            tracing::trace!(path = %path.display(), bytes = value.len(), "Writing record");
            self.write_atomically(&path, &value).await
        })
    }
}
