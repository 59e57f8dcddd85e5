//! Blob Store
//!
//! Writes uploaded content under a generated name inside the content
//! directory. The client-supplied file name never reaches the filesystem
//! path; at most a short alphanumeric extension is carried over so the
//! static file server can pick a sensible content type.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::StorageError;

/// Longest extension kept from the original file name
const MAX_EXTENSION_LEN: usize = 16;

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Name of the file inside the content directory
    pub stored_name: String,

    /// Number of bytes written
    pub size: u64,
}

/// Local filesystem blob store
#[derive(Clone)]
pub struct BlobStore {
    inner: Arc<BlobStoreInner>,
}

struct BlobStoreInner {
    base_path: PathBuf,
}

impl BlobStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(BlobStoreInner {
                base_path: base_path.into(),
            }),
        }
    }

    /// Content directory
    pub fn base_path(&self) -> &Path {
        &self.inner.base_path
    }

    /// Create the content directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.inner.base_path).await?;
        Ok(())
    }

    /// Open a fresh blob for streaming writes.
    ///
    /// The file is opened with `create_new`, so an existing blob is never
    /// overwritten.
    pub async fn create(
        &self,
        original_name: &str,
        timestamp_millis: i64,
    ) -> Result<BlobWriter, StorageError> {
        let stored_name = stored_name_for(timestamp_millis, original_name);
        let path = self.inner.base_path.join(&stored_name);

        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        Ok(BlobWriter {
            file,
            path,
            stored_name,
            size: 0,
        })
    }

    /// Write `data` to a fresh file and return its stored name.
    pub async fn store(
        &self,
        original_name: &str,
        data: &[u8],
        timestamp_millis: i64,
    ) -> Result<StoredBlob, StorageError> {
        let mut writer = self.create(original_name, timestamp_millis).await?;
        if let Err(e) = writer.write_chunk(data).await {
            writer.abort().await;
            return Err(e);
        }
        writer.finish().await
    }

    /// Resolve a stored name to its path inside the content directory.
    pub fn path_for(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_stored_name(stored_name) {
            return Err(StorageError::InvalidName(stored_name.to_string()));
        }
        Ok(self.inner.base_path.join(stored_name))
    }

    /// Read a blob back
    pub async fn read(&self, stored_name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(stored_name)?;
        Ok(tokio::fs::read(path).await?)
    }

    /// Delete a blob. Missing files are not an error.
    pub async fn remove(&self, stored_name: &str) -> Result<bool, StorageError> {
        let path = self.path_for(stored_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Blob being written. Call `finish` to keep it or `abort` to discard it.
pub struct BlobWriter {
    file: tokio::fs::File,
    path: PathBuf,
    stored_name: String,
    size: u64,
}

impl BlobWriter {
    pub fn stored_name(&self) -> &str {
        &self.stored_name
    }

    /// Bytes written so far
    pub fn size(&self) -> u64 {
        self.size
    }

    pub async fn write_chunk(&mut self, data: &[u8]) -> Result<(), StorageError> {
        self.file.write_all(data).await?;
        self.size += data.len() as u64;
        Ok(())
    }

    /// Flush the blob to disk. On `Ok` the blob exists in full; on error the
    /// partial file has been removed.
    pub async fn finish(mut self) -> Result<StoredBlob, StorageError> {
        if let Err(e) = self.file.flush().await {
            self.abort().await;
            return Err(e.into());
        }

        tracing::debug!(
            stored_name = %self.stored_name,
            size = self.size,
            "Blob written"
        );

        Ok(StoredBlob {
            stored_name: self.stored_name,
            size: self.size,
        })
    }

    /// Discard a partially written blob.
    pub async fn abort(self) {
        let BlobWriter { file, path, .. } = self;
        drop(file);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), "Failed to remove partial blob: {}", e);
        }
    }
}

/// Build the on-disk name for an upload: `<millis>-<uuid>[.<ext>]`.
pub fn stored_name_for(timestamp_millis: i64, original_name: &str) -> String {
    let token = Uuid::new_v4().simple();
    match safe_extension(original_name) {
        Some(ext) => format!("{}-{}.{}", timestamp_millis, token, ext),
        None => format!("{}-{}", timestamp_millis, token),
    }
}

fn safe_extension(original_name: &str) -> Option<String> {
    let (stem, ext) = original_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn is_valid_stored_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}
