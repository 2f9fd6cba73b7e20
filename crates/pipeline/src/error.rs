use thiserror::Error;

use posterforge_blob::BlobError;
use posterforge_core::InvalidProduct;
use posterforge_model::ModelError;
use posterforge_state::StateError;

/// Errors surfaced by the generation pipeline.
///
/// Malformed structured output (`SchemaValidationFailed` in the design
/// taxonomy) never appears here: proposal generation recovers it locally
/// by substituting the built-in defaults.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required product fields are missing. Not retried; surfaced
    /// immediately.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The text or image model is unreachable or erroring. Retried only
    /// inside the image-generation stage; surfaced everywhere else.
    #[error("upstream model unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Session or proposal lookup missed after exhausting the legacy key
    /// formats.
    #[error("proposal not found: session {session_id}, proposal {proposal_id}")]
    ProposalNotFound {
        session_id: String,
        proposal_id: String,
    },

    /// The model responded but no usable image could be extracted.
    /// Retried inside the generation loop; triggers fallback when
    /// attempts are exhausted.
    #[error("image extraction failed: {0}")]
    ImageExtractionFailed(String),

    /// Poster generation cannot produce any result: the source photo is
    /// unreadable, the model client is misconfigured, or even the fallback
    /// source-copy failed. Never retried.
    #[error("fatal generation error: {0}")]
    FatalGeneration(String),

    /// Session store failure.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Blob storage failure outside the fallback path.
    #[error("blob error: {0}")]
    Blob(#[from] BlobError),
}

impl From<InvalidProduct> for PipelineError {
    fn from(err: InvalidProduct) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl PipelineError {
    /// Map a model-call failure on a non-retried path.
    pub(crate) fn from_model(err: &ModelError) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}
