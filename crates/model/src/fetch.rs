use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::ModelError;

/// Downloads remote image parts referenced by URL in a model response.
#[async_trait]
pub trait ImageFetcher: Send + Sync + std::fmt::Debug {
    /// Fetch the bytes behind `url`.
    async fn fetch(&self, url: &str) -> Result<Bytes, ModelError>;
}

/// HTTP [`ImageFetcher`] over reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Create a fetcher with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, ModelError> {
        debug!(url, "downloading remote image part");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ModelError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ModelError::Api(format!(
                "image download failed: HTTP {}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| ModelError::Http(e.to_string()))
    }
}
