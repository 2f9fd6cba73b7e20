use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;

/// Pluggable blob storage backend.
///
/// Implementors provide the actual storage mechanism (filesystem, object
/// store). References returned by `write`/`copy` are opaque to the
/// pipeline and only meaningful to the same store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `name` and return an opaque reference to it.
    async fn write(&self, name: &str, data: Bytes) -> Result<String, BlobError>;

    /// Retrieve the bytes behind a reference previously returned by
    /// [`write`](Self::write) or [`copy`](Self::copy).
    async fn read(&self, blob_ref: &str) -> Result<Bytes, BlobError>;

    /// Copy an existing blob to a new name without the caller touching the
    /// bytes. Returns the reference of the copy.
    async fn copy(&self, src_ref: &str, dest_name: &str) -> Result<String, BlobError>;
}
