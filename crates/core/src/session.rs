use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::ProductInfo;
use crate::proposal::Proposal;

/// The proposal set generated for one product-info request, addressable by
/// session id. Created atomically when proposals are generated; immutable
/// thereafter. Expiry is the external store's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    /// Snapshot of the product metadata the proposals were built from.
    pub product_info: ProductInfo,
    /// Ordered, 3-5 entries in the canonical case.
    pub proposals: Vec<Proposal>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with a fresh timestamp.
    #[must_use]
    pub fn new(session_id: impl Into<String>, product_info: ProductInfo, proposals: Vec<Proposal>) -> Self {
        Self {
            session_id: session_id.into(),
            product_info,
            proposals,
            created_at: Utc::now(),
        }
    }

    /// Find a proposal by id.
    #[must_use]
    pub fn proposal(&self, proposal_id: &str) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.proposal_id == proposal_id)
    }
}

/// A fully assembled, enhanced, and repaired generation prompt, cached per
/// `(session_id, proposal_id)` so repeated generation requests are
/// idempotent and skip re-synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalPrompt {
    pub session_id: String,
    pub proposal_id: String,
    pub product_info: ProductInfo,
    pub prompt_text: String,
    pub created_at: DateTime<Utc>,
}

impl FinalPrompt {
    /// Create a cached prompt record with a fresh timestamp.
    #[must_use]
    pub fn new(
        session_id: impl Into<String>,
        proposal_id: impl Into<String>,
        product_info: ProductInfo,
        prompt_text: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            proposal_id: proposal_id.into(),
            product_info,
            prompt_text: prompt_text.into(),
            created_at: Utc::now(),
        }
    }
}
