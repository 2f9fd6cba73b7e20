use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Result of a text-model call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextGeneration {
    /// Parsed structured output. Present only when a schema was supplied
    /// to the call *and* the response parsed against it.
    pub structured: Option<serde_json::Value>,
    /// The raw text of the response, always present.
    pub raw_text: String,
}

/// Contract over a text/structured-output generative call.
#[async_trait]
pub trait TextModelClient: Send + Sync + std::fmt::Debug {
    /// Generate from a natural-language instruction, optionally guided by
    /// a JSON schema for the output shape.
    async fn generate(
        &self,
        instruction: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<TextGeneration, ModelError>;
}

/// One part of a multimodal model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResponsePart {
    /// Plain text commentary.
    Text { text: String },
    /// Inline image bytes, base64-encoded.
    #[serde(rename_all = "camelCase")]
    InlineImage { mime_type: String, data: String },
    /// A remote image the caller must download.
    ImageUrl { url: String },
}

/// Result of an image-model call: an ordered list of response parts,
/// which may or may not contain an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageGeneration {
    pub parts: Vec<ResponsePart>,
}

impl ImageGeneration {
    /// The first inline-image part, if any.
    #[must_use]
    pub fn inline_image(&self) -> Option<(&str, &str)> {
        self.parts.iter().find_map(|p| match p {
            ResponsePart::InlineImage { mime_type, data } => {
                Some((mime_type.as_str(), data.as_str()))
            }
            _ => None,
        })
    }

    /// The first remote-URL part, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            ResponsePart::ImageUrl { url } => Some(url.as_str()),
            _ => None,
        })
    }

    /// Whether any part carries an image (inline or remote).
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.inline_image().is_some() || self.image_url().is_some()
    }
}

/// Contract over a multimodal generative call: prompt plus reference image
/// in, a multi-part response out.
#[async_trait]
pub trait ImageModelClient: Send + Sync + std::fmt::Debug {
    /// Generate an image from `prompt` and the reference photo.
    async fn generate(
        &self,
        prompt: &str,
        reference_image: Bytes,
        mime_type: &str,
    ) -> Result<ImageGeneration, ModelError>;
}
