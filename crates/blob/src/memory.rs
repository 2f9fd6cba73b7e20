use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::error::BlobError;
use crate::store::BlobStore;

/// In-memory [`BlobStore`] backed by a [`DashMap`], for tests and
/// single-process embedders.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    data: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    /// Create a new, empty in-memory blob store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn write(&self, name: &str, data: Bytes) -> Result<String, BlobError> {
        if name.trim().is_empty() {
            return Err(BlobError::InvalidName("empty name".into()));
        }
        self.data.insert(name.to_owned(), data);
        Ok(name.to_owned())
    }

    async fn read(&self, blob_ref: &str) -> Result<Bytes, BlobError> {
        self.data
            .get(blob_ref)
            .map(|entry| entry.clone())
            .ok_or_else(|| BlobError::NotFound(blob_ref.to_owned()))
    }

    async fn copy(&self, src_ref: &str, dest_name: &str) -> Result<String, BlobError> {
        let data = self.read(src_ref).await?;
        self.write(dest_name, data).await
    }
}
