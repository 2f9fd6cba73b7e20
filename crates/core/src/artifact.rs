use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one generated poster, created once per generation attempt.
///
/// `used_fallback = true` means the stored blob is a verbatim copy of the
/// source photo, not a model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterArtifact {
    pub poster_id: String,
    /// Blob reference of the uploaded product photo used as input.
    pub source_image_ref: String,
    /// The exact prompt text sent to the image model.
    pub final_prompt_text: String,
    /// Blob reference of the poster image.
    pub image_blob_ref: String,
    /// Whether the blob is the degraded source-copy fallback.
    pub used_fallback: bool,
    pub created_at: DateTime<Utc>,
}

impl PosterArtifact {
    /// Create an artifact record with a fresh timestamp.
    #[must_use]
    pub fn new(
        poster_id: impl Into<String>,
        source_image_ref: impl Into<String>,
        final_prompt_text: impl Into<String>,
        image_blob_ref: impl Into<String>,
        used_fallback: bool,
    ) -> Self {
        Self {
            poster_id: poster_id.into(),
            source_image_ref: source_image_ref.into(),
            final_prompt_text: final_prompt_text.into(),
            image_blob_ref: image_blob_ref.into(),
            used_fallback,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_serde_roundtrip() {
        let artifact = PosterArtifact::new("po-1", "uploads/a.jpg", "prompt", "posters/po-1.png", false);
        let json = serde_json::to_string(&artifact).unwrap();
        assert!(json.contains("\"usedFallback\":false"));
        let back: PosterArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back.poster_id, "po-1");
        assert!(!back.used_fallback);
    }
}
