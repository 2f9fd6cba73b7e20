//! Request, response, and policy types for the pipeline surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use posterforge_core::ProductInfo;

/// A poster generation request.
///
/// Prompt sources are resolved in priority order: a cached or synthesized
/// proposal prompt when both ids are present, then a caller-supplied raw
/// prompt, then a stored template id, then the generic product prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Session holding the proposal set, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Proposal to render; only meaningful together with `session_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    /// Caller-supplied prompt text, bypassing synthesis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Id of a stored prompt template to expand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Product metadata; always required.
    pub product_info: ProductInfo,
    /// Overrides `product_info.source_image_ref` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image_ref: Option<String>,
}

impl GenerateRequest {
    /// The effective reference-photo blob ref for this request.
    #[must_use]
    pub fn effective_source_ref(&self) -> &str {
        self.source_image_ref
            .as_deref()
            .unwrap_or(&self.product_info.source_image_ref)
    }
}

/// The outcome of a poster generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub poster_id: String,
    /// Blob reference of the stored poster image.
    pub image_ref: String,
    /// True when the image is the degraded source-copy fallback.
    pub used_fallback: bool,
    /// The exact prompt text that was sent to the image model.
    pub final_prompt: String,
}

/// A reusable prompt template with `{productName}` and `{features}`
/// placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: String,
    pub name: String,
    pub template: String,
}

/// Retry policy for the image-generation loop.
///
/// Backoff is linear: the delay before attempt `n + 1` is
/// `base_delay * n`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of model attempts before falling back.
    pub max_retries: u32,
    /// Unit delay multiplied by the completed attempt count.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt after `completed_attempts` failures.
    #[must_use]
    pub fn delay_after(&self, completed_attempts: u32) -> Duration {
        self.base_delay * completed_attempts
    }
}
