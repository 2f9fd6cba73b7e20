//! Mock model clients for tests.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use base64::Engine as _;
use bytes::Bytes;

use crate::client::{
    ImageGeneration, ImageModelClient, ResponsePart, TextGeneration, TextModelClient,
};
use crate::error::ModelError;
use crate::fetch::ImageFetcher;

/// A mock text model that returns a fixed response and counts calls.
#[derive(Debug, Default)]
pub struct MockTextModel {
    structured: Option<serde_json::Value>,
    raw_text: String,
    calls: AtomicU32,
}

impl MockTextModel {
    /// Mock returning only raw text (no structured output).
    pub fn with_raw(raw_text: impl Into<String>) -> Self {
        Self {
            structured: None,
            raw_text: raw_text.into(),
            calls: AtomicU32::new(0),
        }
    }

    /// Mock returning structured output alongside its JSON text form.
    #[must_use]
    pub fn with_structured(structured: serde_json::Value) -> Self {
        let raw_text = structured.to_string();
        Self {
            structured: Some(structured),
            raw_text,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModelClient for MockTextModel {
    async fn generate(
        &self,
        _instruction: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<TextGeneration, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TextGeneration {
            // Structured output only surfaces when the caller asked for it.
            structured: if schema.is_some() {
                self.structured.clone()
            } else {
                None
            },
            raw_text: self.raw_text.clone(),
        })
    }
}

/// A mock text model that always fails with an API error.
#[derive(Debug)]
pub struct FailingTextModel {
    message: String,
}

impl FailingTextModel {
    /// Create a failing text model with the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl TextModelClient for FailingTextModel {
    async fn generate(
        &self,
        _instruction: &str,
        _schema: Option<&serde_json::Value>,
    ) -> Result<TextGeneration, ModelError> {
        Err(ModelError::Api(self.message.clone()))
    }
}

/// Base64 of the payload used by [`MockImageModel::inline_png`].
#[must_use]
pub fn fake_png_base64() -> String {
    base64::engine::general_purpose::STANDARD.encode(b"fake-png-bytes")
}

/// A mock image model that returns configured parts and counts calls.
#[derive(Debug, Default)]
pub struct MockImageModel {
    parts: Vec<ResponsePart>,
    calls: AtomicU32,
}

impl MockImageModel {
    /// Mock returning a text part plus an inline PNG.
    #[must_use]
    pub fn inline_png() -> Self {
        Self {
            parts: vec![
                ResponsePart::Text {
                    text: "generated poster".into(),
                },
                ResponsePart::InlineImage {
                    mime_type: "image/png".into(),
                    data: fake_png_base64(),
                },
            ],
            calls: AtomicU32::new(0),
        }
    }

    /// Mock returning exactly the given parts.
    #[must_use]
    pub fn with_parts(parts: Vec<ResponsePart>) -> Self {
        Self {
            parts,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageModelClient for MockImageModel {
    async fn generate(
        &self,
        _prompt: &str,
        _reference_image: Bytes,
        _mime_type: &str,
    ) -> Result<ImageGeneration, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ImageGeneration {
            parts: self.parts.clone(),
        })
    }
}

/// A mock image model that always fails with a retryable error.
#[derive(Debug, Default)]
pub struct FailingImageModel {
    calls: AtomicU32,
}

impl FailingImageModel {
    /// Create a failing image model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageModelClient for FailingImageModel {
    async fn generate(
        &self,
        _prompt: &str,
        _reference_image: Bytes,
        _mime_type: &str,
    ) -> Result<ImageGeneration, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ModelError::Api("simulated outage".into()))
    }
}

/// A mock image model that fails the first `fail_before` calls, then
/// succeeds with an inline PNG.
#[derive(Debug)]
pub struct FlakyImageModel {
    fail_before: u32,
    calls: AtomicU32,
}

impl FlakyImageModel {
    /// Succeed starting from attempt `fail_before + 1`.
    #[must_use]
    pub fn new(fail_before: u32) -> Self {
        Self {
            fail_before,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageModelClient for FlakyImageModel {
    async fn generate(
        &self,
        _prompt: &str,
        _reference_image: Bytes,
        _mime_type: &str,
    ) -> Result<ImageGeneration, ModelError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.fail_before {
            return Err(ModelError::Http("connection reset".into()));
        }
        Ok(ImageGeneration {
            parts: vec![ResponsePart::InlineImage {
                mime_type: "image/png".into(),
                data: fake_png_base64(),
            }],
        })
    }
}

/// A mock fetcher serving fixed bytes for any URL.
#[derive(Debug, Clone)]
pub struct MockImageFetcher {
    data: Bytes,
}

impl MockImageFetcher {
    /// Serve the given bytes for every fetch.
    #[must_use]
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn fetch(&self, _url: &str) -> Result<Bytes, ModelError> {
        Ok(self.data.clone())
    }
}
