//! Proposal generation.
//!
//! One structured text-model call per request. Malformed or out-of-range
//! model output never surfaces to the caller: the built-in default designs
//! are substituted locally and the session is created either way.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use posterforge_core::{new_id, ProductInfo, Proposal, Session};
use posterforge_model::client::{TextGeneration, TextModelClient};
use posterforge_model::gemini::strip_code_fences;
use posterforge_state::key::StoreKey;
use posterforge_state::store::{SessionStore, SessionStoreExt as _};

use crate::defaults::default_proposals;
use crate::error::PipelineError;
use crate::templates::{proposal_instruction, proposal_schema};

/// Generates a session's proposal set from product metadata.
pub struct ProposalGenerator {
    text_model: Arc<dyn TextModelClient>,
    store: Arc<dyn SessionStore>,
    session_ttl: Option<Duration>,
}

impl ProposalGenerator {
    /// Create a generator writing sessions without expiry.
    pub fn new(text_model: Arc<dyn TextModelClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            text_model,
            store,
            session_ttl: None,
        }
    }

    /// Expire stored sessions after `ttl`.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    /// Generate 3-5 poster proposals for `product` and persist them as a
    /// session.
    ///
    /// A caller-supplied `session_id` is honored (overwriting any previous
    /// proposal set under it); otherwise a fresh id is assigned.
    pub async fn generate(
        &self,
        product: ProductInfo,
        session_id: Option<String>,
    ) -> Result<Session, PipelineError> {
        product.validate()?;
        let session_id = session_id.unwrap_or_else(new_id);

        let instruction = proposal_instruction(&product);
        let schema = proposal_schema();
        debug!(%session_id, product = %product.name, "requesting poster proposals");
        let generation = self
            .text_model
            .generate(&instruction, Some(&schema))
            .await
            .map_err(|e| PipelineError::from_model(&e))?;

        let proposals = match parse_proposals(&generation) {
            Some(proposals) => proposals,
            None => {
                warn!(%session_id, "proposal output failed validation; using built-in defaults");
                default_proposals(&product)
            }
        };

        let session = Session::new(session_id, product, proposals);
        self.store
            .put_json(
                &StoreKey::proposals(&session.session_id),
                &session,
                self.session_ttl,
            )
            .await?;
        debug!(
            session_id = %session.session_id,
            count = session.proposals.len(),
            "stored proposal session"
        );
        Ok(session)
    }
}

/// Extract and normalize a valid proposal set from model output, or `None`
/// when the output is unusable.
///
/// Accepts the structured channel first, then the raw text with optional
/// markdown fences. The array may be bare or wrapped in a `proposals`
/// field. Between 3 and 5 entries are required; each entry gets an id when
/// missing, a headline defaulted to the empty-safe model copy, and its
/// displayed features truncated to the render limit.
fn parse_proposals(generation: &TextGeneration) -> Option<Vec<Proposal>> {
    let value = match &generation.structured {
        Some(v) => v.clone(),
        None => serde_json::from_str(strip_code_fences(&generation.raw_text)).ok()?,
    };
    let array = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut map) => map.remove("proposals")?,
        _ => return None,
    };

    let mut proposals: Vec<Proposal> = serde_json::from_value(array).ok()?;
    if !(3..=5).contains(&proposals.len()) {
        return None;
    }
    if proposals
        .iter()
        .any(|p| p.displayed_text.headline.trim().is_empty())
    {
        return None;
    }
    for (index, proposal) in proposals.iter_mut().enumerate() {
        if proposal.proposal_id.trim().is_empty() {
            proposal.proposal_id = format!("p{}", index + 1);
        }
        proposal.displayed_text.truncate_features();
    }
    Some(proposals)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use posterforge_model::mock::{FailingTextModel, MockTextModel};
    use posterforge_state::store::SessionStoreExt as _;
    use posterforge_state_memory::MemorySessionStore;

    use super::*;

    fn product() -> ProductInfo {
        ProductInfo {
            name: "Aurora Strip".into(),
            features: vec!["waterproof".into(), "dimmable".into()],
            target_audience: None,
            scene_description: None,
            poster_aspect_ratio: None,
            source_image_ref: "uploads/a.jpg".into(),
        }
    }

    fn model_proposal(headline: &str) -> serde_json::Value {
        json!({
            "styleName": "Minimal",
            "styleDescription": "Clean and airy.",
            "productPlacement": "center",
            "backgroundDescription": "studio",
            "textPlacement": "bottom",
            "layoutDescription": "centered",
            "lightingRequirements": "soft",
            "colorTone": "neutral",
            "posterAspectRatio": "16:9",
            "displayedText": {
                "headline": headline,
                "tagline": "t",
                "features": ["waterproof", "dimmable", "smart", "extra"]
            }
        })
    }

    fn generator(model: Arc<dyn TextModelClient>) -> (ProposalGenerator, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (ProposalGenerator::new(model, store.clone()), store)
    }

    #[tokio::test]
    async fn structured_output_becomes_session_with_assigned_ids() {
        let model = Arc::new(MockTextModel::with_structured(json!([
            model_proposal("One"),
            model_proposal("Two"),
            model_proposal("Three"),
        ])));
        let (generator, store) = generator(model.clone());

        let session = generator.generate(product(), None).await.unwrap();
        assert_eq!(session.proposals.len(), 3);
        assert_eq!(session.proposals[0].proposal_id, "p1");
        assert_eq!(session.proposals[2].proposal_id, "p3");
        // Displayed features are truncated to the render limit.
        assert_eq!(session.proposals[0].displayed_text.features.len(), 3);
        assert_eq!(model.call_count(), 1);

        let stored: Session = store
            .get_json(&StoreKey::proposals(&session.session_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.proposals.len(), 3);
    }

    #[tokio::test]
    async fn caller_session_id_is_honored() {
        let model = Arc::new(MockTextModel::with_structured(json!([
            model_proposal("One"),
            model_proposal("Two"),
            model_proposal("Three"),
        ])));
        let (generator, _store) = generator(model);
        let session = generator.generate(product(), Some("s-fixed".into())).await.unwrap();
        assert_eq!(session.session_id, "s-fixed");
    }

    #[tokio::test]
    async fn wrapped_object_shape_is_accepted() {
        let model = Arc::new(MockTextModel::with_structured(json!({
            "proposals": [
                model_proposal("One"),
                model_proposal("Two"),
                model_proposal("Three"),
            ]
        })));
        let (generator, _store) = generator(model);
        let session = generator.generate(product(), None).await.unwrap();
        assert_eq!(session.proposals.len(), 3);
        assert_eq!(session.proposals[0].displayed_text.headline, "One");
    }

    #[tokio::test]
    async fn fenced_raw_text_is_accepted() {
        let payload = json!([
            model_proposal("One"),
            model_proposal("Two"),
            model_proposal("Three"),
        ]);
        let model = Arc::new(MockTextModel::with_raw(format!("```json\n{payload}\n```")));
        let (generator, _store) = generator(model);
        let session = generator.generate(product(), None).await.unwrap();
        assert_eq!(session.proposals.len(), 3);
    }

    #[tokio::test]
    async fn out_of_range_count_falls_back_to_defaults() {
        let model = Arc::new(MockTextModel::with_structured(json!([
            model_proposal("Only one"),
        ])));
        let (generator, _store) = generator(model);
        let session = generator.generate(product(), None).await.unwrap();
        assert_eq!(session.proposals.len(), 3);
        assert_eq!(session.proposals[0].style_name, "Futuristic Tech");
    }

    #[tokio::test]
    async fn non_json_output_falls_back_to_defaults() {
        let model = Arc::new(MockTextModel::with_raw("I cannot answer that."));
        let (generator, _store) = generator(model);
        let session = generator.generate(product(), None).await.unwrap();
        assert_eq!(session.proposals.len(), 3);
        for p in &session.proposals {
            assert_eq!(p.displayed_text.headline, "Aurora Strip");
        }
    }

    #[tokio::test]
    async fn blank_headline_falls_back_to_defaults() {
        let model = Arc::new(MockTextModel::with_structured(json!([
            model_proposal("One"),
            model_proposal("  "),
            model_proposal("Three"),
        ])));
        let (generator, _store) = generator(model);
        let session = generator.generate(product(), None).await.unwrap();
        assert_eq!(session.proposals[0].style_name, "Futuristic Tech");
    }

    #[tokio::test]
    async fn unreachable_model_surfaces_upstream_error() {
        let model = Arc::new(FailingTextModel::new("down"));
        let (generator, _store) = generator(model);
        let err = generator.generate(product(), None).await.unwrap_err();
        assert!(matches!(err, PipelineError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn invalid_product_rejected_before_any_call() {
        let model = Arc::new(MockTextModel::with_raw("unused"));
        let (generator, _store) = generator(model.clone());
        let mut p = product();
        p.name = " ".into();
        let err = generator.generate(p, None).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert_eq!(model.call_count(), 0);
    }
}
