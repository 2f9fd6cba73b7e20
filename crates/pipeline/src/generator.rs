//! Poster generation with retry and source-copy fallback.
//!
//! The generation loop never gives up with nothing: after the configured
//! attempts (or on cancellation) it degrades to copying the uploaded
//! product photo as the poster, flagged via `used_fallback` so callers can
//! tell a real render from the degraded result.

use std::sync::Arc;

use base64::Engine as _;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use posterforge_blob::store::BlobStore;
use posterforge_core::{new_id, PosterArtifact};
use posterforge_model::client::{ImageModelClient, TextModelClient};
use posterforge_model::fetch::ImageFetcher;
use posterforge_model::gemini::strip_code_fences;
use posterforge_state::key::StoreKey;
use posterforge_state::store::{SessionStore, SessionStoreExt as _};

use crate::defaults::builtin_template;
use crate::error::PipelineError;
use crate::phase::GenerationPhase;
use crate::prompt::PromptSynthesizer;
use crate::templates::{generic_prompt, optimize_instruction, render_template};
use crate::types::{GenerateRequest, GenerateResponse, PromptTemplate, RetryPolicy};

/// Orchestrates prompt resolution, the image-model retry loop, and poster
/// persistence.
pub struct PosterGenerator {
    image_model: Arc<dyn ImageModelClient>,
    text_model: Arc<dyn TextModelClient>,
    fetcher: Arc<dyn ImageFetcher>,
    blobs: Arc<dyn BlobStore>,
    store: Arc<dyn SessionStore>,
    synthesizer: PromptSynthesizer,
    retry: RetryPolicy,
}

impl PosterGenerator {
    /// Create a generator with the default retry policy.
    pub fn new(
        image_model: Arc<dyn ImageModelClient>,
        text_model: Arc<dyn TextModelClient>,
        fetcher: Arc<dyn ImageFetcher>,
        blobs: Arc<dyn BlobStore>,
        store: Arc<dyn SessionStore>,
        synthesizer: PromptSynthesizer,
    ) -> Self {
        Self {
            image_model,
            text_model,
            fetcher,
            blobs,
            store,
            synthesizer,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generate a poster for `request`.
    ///
    /// Cancelling `cancel` stops further retries; an in-flight wait
    /// short-circuits straight to the fallback copy.
    pub async fn generate(
        &self,
        request: GenerateRequest,
        cancel: CancellationToken,
    ) -> Result<GenerateResponse, PipelineError> {
        request.product_info.validate()?;

        let prompt = self.resolve_prompt(&request).await?;
        let source_ref = request.effective_source_ref().to_owned();
        let source = self
            .blobs
            .read(&source_ref)
            .await
            .map_err(|e| PipelineError::FatalGeneration(format!("source image unreadable: {e}")))?;
        let source_mime = mime_for_ref(&source_ref);

        let poster_id = new_id();
        let mut phase = GenerationPhase::start();
        loop {
            match phase {
                GenerationPhase::Generating { attempt } => {
                    debug!(%poster_id, attempt, "poster generation attempt");
                    match self.attempt(&prompt, source.clone(), source_mime).await {
                        Ok((image, ext)) => {
                            return self
                                .persist(&poster_id, &source_ref, &prompt, image, &ext, false)
                                .await;
                        }
                        // Misconfiguration will not heal across retries.
                        Err(e @ PipelineError::FatalGeneration(_)) => return Err(e),
                        Err(e) => {
                            warn!(%poster_id, attempt, error = %e, "poster attempt failed");
                            phase = GenerationPhase::after_failure(attempt, &self.retry);
                        }
                    }
                }
                GenerationPhase::Retrying {
                    next_attempt,
                    delay,
                } => {
                    tokio::select! {
                        () = cancel.cancelled() => {
                            warn!(%poster_id, "generation cancelled; falling back");
                            phase = GenerationPhase::Fallback;
                        }
                        () = tokio::time::sleep(delay) => {
                            phase = GenerationPhase::Generating { attempt: next_attempt };
                        }
                    }
                }
                GenerationPhase::Fallback => {
                    return self.fallback(&poster_id, &source_ref, &prompt).await;
                }
            }
        }
    }

    /// Resolve the prompt text for a request, in priority order: proposal
    /// selection, caller-supplied prompt, stored template, generic prompt.
    async fn resolve_prompt(&self, request: &GenerateRequest) -> Result<String, PipelineError> {
        if let (Some(session_id), Some(proposal_id)) =
            (request.session_id.as_deref(), request.proposal_id.as_deref())
        {
            let record = self
                .synthesizer
                .synthesize(session_id, proposal_id, &request.product_info)
                .await?;
            return Ok(record.prompt_text);
        }
        if let Some(prompt) = request.prompt.as_deref() {
            let trimmed = prompt.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_owned());
            }
        }
        if let Some(template_id) = request.template_id.as_deref() {
            if let Some(template) = self.lookup_template(template_id).await? {
                let rendered = render_template(&template.template, &request.product_info);
                return Ok(self.optimize(&rendered, &request.product_info).await);
            }
            warn!(%template_id, "unknown template id; using generic prompt");
        }
        Ok(generic_prompt(&request.product_info))
    }

    /// Stored templates shadow the built-in set.
    async fn lookup_template(
        &self,
        template_id: &str,
    ) -> Result<Option<PromptTemplate>, PipelineError> {
        if let Some(stored) = self
            .store
            .get_json::<PromptTemplate>(&StoreKey::template(template_id))
            .await?
        {
            return Ok(Some(stored));
        }
        Ok(builtin_template(template_id))
    }

    /// One best-effort optimization call on the template path. Failure
    /// keeps the rendered template text.
    async fn optimize(&self, rendered: &str, product: &posterforge_core::ProductInfo) -> String {
        let instruction = optimize_instruction(rendered, product);
        match self.text_model.generate(&instruction, None).await {
            Ok(generation) => {
                let text = strip_code_fences(&generation.raw_text).trim();
                if text.is_empty() {
                    rendered.to_owned()
                } else {
                    text.to_owned()
                }
            }
            Err(e) => {
                warn!(error = %e, "template optimization failed; using rendered template");
                rendered.to_owned()
            }
        }
    }

    /// One model attempt: call, then extract image bytes from the parts.
    /// Inline base64 data wins over a hosted URL.
    async fn attempt(
        &self,
        prompt: &str,
        source: Bytes,
        source_mime: &str,
    ) -> Result<(Bytes, String), PipelineError> {
        let generation = self
            .image_model
            .generate(prompt, source, source_mime)
            .await
            .map_err(|e| {
                if e.is_retryable() {
                    PipelineError::from_model(&e)
                } else {
                    PipelineError::FatalGeneration(e.to_string())
                }
            })?;

        if let Some((mime, data)) = generation.inline_image() {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| {
                    PipelineError::ImageExtractionFailed(format!("invalid inline base64: {e}"))
                })?;
            return Ok((Bytes::from(bytes), extension_for_mime(mime).to_owned()));
        }
        if let Some(url) = generation.image_url() {
            let bytes = self
                .fetcher
                .fetch(url)
                .await
                .map_err(|e| PipelineError::ImageExtractionFailed(format!("fetch failed: {e}")))?;
            return Ok((bytes, extension_for_ref(url).to_owned()));
        }
        Err(PipelineError::ImageExtractionFailed(
            "response contained no image part".into(),
        ))
    }

    /// Store the poster blob and its artifact record.
    async fn persist(
        &self,
        poster_id: &str,
        source_ref: &str,
        prompt: &str,
        image: Bytes,
        ext: &str,
        used_fallback: bool,
    ) -> Result<GenerateResponse, PipelineError> {
        let name = format!("posters/poster-{poster_id}.{ext}");
        let image_ref = self.blobs.write(&name, image).await?;
        let artifact =
            PosterArtifact::new(poster_id, source_ref, prompt, image_ref.clone(), used_fallback);
        self.store
            .put_json(&StoreKey::poster(poster_id), &artifact, None)
            .await?;
        debug!(%poster_id, %image_ref, used_fallback, "poster stored");
        Ok(GenerateResponse {
            poster_id: poster_id.to_owned(),
            image_ref,
            used_fallback,
            final_prompt: prompt.to_owned(),
        })
    }

    /// Degraded path: copy the source photo as the poster.
    async fn fallback(
        &self,
        poster_id: &str,
        source_ref: &str,
        prompt: &str,
    ) -> Result<GenerateResponse, PipelineError> {
        let ext = extension_for_ref(source_ref);
        let name = format!("posters/poster-{poster_id}.{ext}");
        let image_ref = self.blobs.copy(source_ref, &name).await.map_err(|e| {
            PipelineError::FatalGeneration(format!("fallback copy failed: {e}"))
        })?;
        let artifact = PosterArtifact::new(poster_id, source_ref, prompt, image_ref.clone(), true);
        self.store
            .put_json(&StoreKey::poster(poster_id), &artifact, None)
            .await?;
        warn!(%poster_id, %image_ref, "poster degraded to source copy");
        Ok(GenerateResponse {
            poster_id: poster_id.to_owned(),
            image_ref,
            used_fallback: true,
            final_prompt: prompt.to_owned(),
        })
    }
}

fn mime_for_ref(blob_ref: &str) -> &'static str {
    match extension_for_ref(blob_ref) {
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/png",
    }
}

fn extension_for_ref(blob_ref: &str) -> &str {
    blob_ref
        .rsplit_once('.')
        .map_or("png", |(_, ext)| ext)
}

fn extension_for_mime(mime: &str) -> &str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}
