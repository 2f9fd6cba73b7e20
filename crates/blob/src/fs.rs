use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::BlobError;
use crate::store::BlobStore;

/// Filesystem-backed [`BlobStore`] rooted at a single directory.
///
/// References are paths relative to the root. Parent directories are
/// created on demand so embedders can use nested names like
/// `posters/poster-xyz.png`.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`. The directory itself is created
    /// lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reject empty names and names that traverse out of the root.
    fn resolve(&self, name: &str) -> Result<PathBuf, BlobError> {
        if name.trim().is_empty() {
            return Err(BlobError::InvalidName("empty name".into()));
        }
        let relative = Path::new(name);
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return Err(BlobError::InvalidName(name.to_owned()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, name: &str, data: Bytes) -> Result<String, BlobError> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &data).await?;
        debug!(name, bytes = data.len(), "wrote blob");
        Ok(name.to_owned())
    }

    async fn read(&self, blob_ref: &str) -> Result<Bytes, BlobError> {
        let path = self.resolve(blob_ref)?;
        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlobError::NotFound(blob_ref.to_owned())
            } else {
                BlobError::from(e)
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn copy(&self, src_ref: &str, dest_name: &str) -> Result<String, BlobError> {
        let src = self.resolve(src_ref)?;
        let dest = self.resolve(dest_name)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&src, &dest).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlobError::NotFound(src_ref.to_owned())
            } else {
                BlobError::from(e)
            }
        })?;
        debug!(src = src_ref, dest = dest_name, "copied blob");
        Ok(dest_name.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let blob_ref = store
            .write("posters/a.png", Bytes::from_static(b"png-bytes"))
            .await
            .unwrap();
        assert_eq!(blob_ref, "posters/a.png");

        let back = store.read(&blob_ref).await.unwrap();
        assert_eq!(back.as_ref(), b"png-bytes");
    }

    #[tokio::test]
    async fn copy_preserves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        store
            .write("uploads/src.jpg", Bytes::from_static(b"source"))
            .await
            .unwrap();
        let copy_ref = store.copy("uploads/src.jpg", "posters/fallback.jpg").await.unwrap();

        let back = store.read(&copy_ref).await.unwrap();
        assert_eq!(back.as_ref(), b"source");
    }

    #[tokio::test]
    async fn missing_blob_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let err = store.read("nope.png").await.unwrap_err();
        assert!(matches!(err, BlobError::NotFound(_)));

        let err = store.copy("nope.png", "dest.png").await.unwrap_err();
        assert!(matches!(err, BlobError::NotFound(_)));
    }

    #[tokio::test]
    async fn traversal_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let err = store
            .write("../escape.png", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::InvalidName(_)));

        let err = store.read("").await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidName(_)));
    }
}
