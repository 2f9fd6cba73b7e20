//! Final-prompt synthesis.
//!
//! Turns a proposal selection into the exact text sent to the image
//! model: deterministic base prompt, one best-effort enhancement call,
//! literal repair, and a per-selection cache so repeated generation
//! requests skip re-synthesis entirely.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use posterforge_core::{FinalPrompt, ProductInfo, Proposal, Session};
use posterforge_model::client::TextModelClient;
use posterforge_model::gemini::strip_code_fences;
use posterforge_state::key::{proposal_lookup_keys, StoreKey};
use posterforge_state::store::{SessionStore, SessionStoreExt as _};
use posterforge_state::StateError;

use crate::error::PipelineError;
use crate::literals::{ensure_composition_clause, repair, required_literals};
use crate::templates::{base_prompt, enhancement_instruction};

/// The value shapes historically written under proposal keys.
///
/// Current writes are full [`Session`] records; older deployments stored a
/// wrapped object or the bare proposal array. Readers accept all three.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredProposals {
    Session(Session),
    Wrapped { proposals: Vec<Proposal> },
    List(Vec<Proposal>),
}

impl StoredProposals {
    fn into_parts(self) -> (Vec<Proposal>, Option<ProductInfo>) {
        match self {
            Self::Session(session) => (session.proposals, Some(session.product_info)),
            Self::Wrapped { proposals } | Self::List(proposals) => (proposals, None),
        }
    }
}

/// Synthesizes and caches the final prompt for one proposal selection.
pub struct PromptSynthesizer {
    text_model: Arc<dyn TextModelClient>,
    store: Arc<dyn SessionStore>,
    prompt_ttl: Option<Duration>,
}

impl PromptSynthesizer {
    /// Create a synthesizer caching prompts without expiry.
    pub fn new(text_model: Arc<dyn TextModelClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            text_model,
            store,
            prompt_ttl: None,
        }
    }

    /// Expire cached prompts after `ttl`.
    #[must_use]
    pub fn with_prompt_ttl(mut self, ttl: Duration) -> Self {
        self.prompt_ttl = Some(ttl);
        self
    }

    /// Produce the final prompt for `(session_id, proposal_id)`.
    ///
    /// Cached results are returned without any model call. On a miss the
    /// proposal set is resolved through the legacy key chain, the base
    /// prompt is built, enhanced best-effort, and repaired; the result is
    /// cached before returning. `product` is only consulted when the
    /// stored proposal set predates product snapshots.
    pub async fn synthesize(
        &self,
        session_id: &str,
        proposal_id: &str,
        product: &ProductInfo,
    ) -> Result<FinalPrompt, PipelineError> {
        let cache_key = StoreKey::prompt(session_id, proposal_id);
        match self.store.get_json::<FinalPrompt>(&cache_key).await {
            Ok(Some(cached)) => {
                debug!(%session_id, %proposal_id, "final prompt served from cache");
                return Ok(cached);
            }
            Ok(None) => {}
            // A corrupt cache entry is a miss, not a failure.
            Err(StateError::Serialization(e)) => {
                warn!(%session_id, %proposal_id, error = %e, "unreadable cached prompt; regenerating");
            }
            Err(e) => return Err(e.into()),
        }

        let (proposal, stored_product) = self.resolve_proposal(session_id, proposal_id).await?;
        let product = stored_product.as_ref().unwrap_or(product);

        let base = base_prompt(&proposal, product);
        let enhanced = self.enhance(&base, product).await;
        let repaired = repair(&enhanced, &required_literals(product, &proposal));
        let prompt_text = ensure_composition_clause(repaired, proposal.poster_aspect_ratio);

        let record = FinalPrompt::new(session_id, proposal_id, product.clone(), prompt_text);
        if let Err(e) = self
            .store
            .put_json(&cache_key, &record, self.prompt_ttl)
            .await
        {
            warn!(%session_id, %proposal_id, error = %e, "failed to cache final prompt");
        }
        Ok(record)
    }

    /// Resolve the proposal set through the key chain and pick the
    /// selected proposal. The first key whose value parses wins; an
    /// unparsable value falls through to the next key.
    async fn resolve_proposal(
        &self,
        session_id: &str,
        proposal_id: &str,
    ) -> Result<(Proposal, Option<ProductInfo>), PipelineError> {
        for key in proposal_lookup_keys(session_id) {
            let Some(raw) = self.store.get(&key).await? else {
                continue;
            };
            let Ok(stored) = serde_json::from_str::<StoredProposals>(&raw) else {
                warn!(%key, "unparsable proposal record; trying next key");
                continue;
            };
            let (proposals, product) = stored.into_parts();
            let proposal = proposals
                .into_iter()
                .find(|p| p.proposal_id == proposal_id)
                .ok_or_else(|| PipelineError::ProposalNotFound {
                    session_id: session_id.to_owned(),
                    proposal_id: proposal_id.to_owned(),
                })?;
            return Ok((proposal, product));
        }
        Err(PipelineError::ProposalNotFound {
            session_id: session_id.to_owned(),
            proposal_id: proposal_id.to_owned(),
        })
    }

    /// One best-effort enhancement call. Any failure, or an empty
    /// response, keeps the base prompt.
    async fn enhance(&self, base: &str, product: &ProductInfo) -> String {
        let instruction = enhancement_instruction(base, product);
        match self.text_model.generate(&instruction, None).await {
            Ok(generation) => {
                let text = strip_code_fences(&generation.raw_text).trim();
                if text.is_empty() {
                    warn!("enhancement returned empty text; keeping base prompt");
                    base.to_owned()
                } else {
                    text.to_owned()
                }
            }
            Err(e) => {
                warn!(error = %e, "prompt enhancement failed; keeping base prompt");
                base.to_owned()
            }
        }
    }
}
