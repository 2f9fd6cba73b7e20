use async_trait::async_trait;
use base64::Engine as _;
use bytes::Bytes;
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{
    ImageGeneration, ImageModelClient, ResponsePart, TextGeneration, TextModelClient,
};
use crate::config::ModelConfig;
use crate::error::ModelError;

/// Build a reqwest client honoring the configured timeout.
fn http_client(config: &ModelConfig) -> Result<reqwest::Client, ModelError> {
    if config.api_key.trim().is_empty() {
        return Err(ModelError::Configuration("API key is not set".into()));
    }
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build()
        .map_err(|e| ModelError::Configuration(e.to_string()))
}

/// Map a reqwest failure to a [`ModelError`].
fn transport_error(config: &ModelConfig, err: &reqwest::Error) -> ModelError {
    if err.is_timeout() {
        ModelError::Timeout(config.timeout_seconds)
    } else {
        ModelError::Http(err.to_string())
    }
}

/// POST a `generateContent` request and return the parsed JSON body.
async fn generate_content(
    client: &reqwest::Client,
    config: &ModelConfig,
    body: &serde_json::Value,
) -> Result<serde_json::Value, ModelError> {
    let url = format!(
        "{}/models/{}:generateContent",
        config.endpoint.trim_end_matches('/'),
        config.model
    );

    debug!(model = %config.model, "sending generateContent request");

    let response = client
        .post(&url)
        .query(&[("key", config.api_key.as_str())])
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(|e| transport_error(config, &e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, "model API returned error");
        return Err(ModelError::Api(format!("HTTP {status}: {body}")));
    }

    response
        .json()
        .await
        .map_err(|e| ModelError::Parse(format!("failed to parse API response: {e}")))
}

/// Extract the parts array of the first candidate.
fn candidate_parts(body: &serde_json::Value) -> Result<&Vec<serde_json::Value>, ModelError> {
    body.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| ModelError::Parse(format!("unexpected response format: {body}")))
}

/// Strip markdown code fences (```json ... ``` or ``` ... ```) that models
/// habitually wrap JSON output in.
#[must_use]
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let without_opening = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_opening
        .strip_suffix("```")
        .unwrap_or(without_opening)
        .trim()
}

/// Text model over the Gemini `generateContent` HTTP API.
#[derive(Debug)]
pub struct GeminiTextModel {
    client: reqwest::Client,
    config: ModelConfig,
}

impl GeminiTextModel {
    /// Create a new text model client with the given configuration.
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let client = http_client(&config)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextModelClient for GeminiTextModel {
    async fn generate(
        &self,
        instruction: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<TextGeneration, ModelError> {
        let mut generation_config = json!({
            "temperature": self.config.temperature,
            "topK": self.config.top_k,
            "topP": self.config.top_p,
            "maxOutputTokens": self.config.max_output_tokens,
        });
        if let Some(schema) = schema {
            generation_config["responseMimeType"] = json!("application/json");
            generation_config["responseSchema"] = schema.clone();
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": instruction }] }],
            "generationConfig": generation_config,
        });

        let response = generate_content(&self.client, &self.config, &body).await?;
        let parts = candidate_parts(&response)?;

        let raw_text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("");
        if raw_text.is_empty() {
            return Err(ModelError::Parse("response contained no text part".into()));
        }

        // Parse failures are not errors here: the caller decides whether
        // to fall back to defaults or use the raw text.
        let structured = if schema.is_some() {
            match serde_json::from_str(strip_code_fences(&raw_text)) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(error = %e, "structured output did not parse; returning raw text only");
                    None
                }
            }
        } else {
            None
        };

        Ok(TextGeneration {
            structured,
            raw_text,
        })
    }
}

/// Multimodal image model over the Gemini `generateContent` HTTP API.
///
/// Sends the prompt together with the base64-encoded reference photo and
/// requests both text and image response modalities.
#[derive(Debug)]
pub struct GeminiImageModel {
    client: reqwest::Client,
    config: ModelConfig,
}

impl GeminiImageModel {
    /// Create a new image model client with the given configuration.
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let client = http_client(&config)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImageModelClient for GeminiImageModel {
    async fn generate(
        &self,
        prompt: &str,
        reference_image: Bytes,
        mime_type: &str,
    ) -> Result<ImageGeneration, ModelError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&reference_image);

        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "inlineData": { "mimeType": mime_type, "data": encoded } }
                ]
            }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topK": self.config.top_k,
                "topP": self.config.top_p,
                "maxOutputTokens": self.config.max_output_tokens,
                "responseModalities": ["Text", "Image"],
            },
        });

        let response = generate_content(&self.client, &self.config, &body).await?;
        let raw_parts = candidate_parts(&response)?;

        let mut parts = Vec::with_capacity(raw_parts.len());
        for part in raw_parts {
            if let Some(inline) = part.get("inlineData") {
                let mime = inline
                    .get("mimeType")
                    .and_then(|m| m.as_str())
                    .unwrap_or("image/png");
                let data = inline
                    .get("data")
                    .and_then(|d| d.as_str())
                    .ok_or_else(|| ModelError::Parse("inlineData part without data".into()))?;
                parts.push(ResponsePart::InlineImage {
                    mime_type: mime.to_owned(),
                    data: data.to_owned(),
                });
            } else if let Some(uri) = part
                .get("fileData")
                .and_then(|f| f.get("fileUri"))
                .and_then(|u| u.as_str())
            {
                parts.push(ResponsePart::ImageUrl {
                    url: uri.to_owned(),
                });
            } else if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                parts.push(ResponsePart::Text {
                    text: text.to_owned(),
                });
            }
        }

        Ok(ImageGeneration { parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_plain_fences() {
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn strip_json_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn unfenced_content_untouched() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn candidate_parts_happy_path() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "hello" }] } }]
        });
        let parts = candidate_parts(&body).unwrap();
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn candidate_parts_missing_is_parse_error() {
        let body = json!({ "candidates": [] });
        assert!(matches!(
            candidate_parts(&body).unwrap_err(),
            ModelError::Parse(_)
        ));
    }

    #[test]
    fn empty_api_key_rejected() {
        let config = ModelConfig::new("https://e", "m", "  ");
        assert!(matches!(
            GeminiTextModel::new(config).unwrap_err(),
            ModelError::Configuration(_)
        ));
    }
}
