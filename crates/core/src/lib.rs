//! Core domain types for the posterforge generation pipeline.
//!
//! Everything here is a plain serde-serializable value type. Persistence
//! lifetime belongs to the external store; this crate only owns value
//! construction and input validation.

pub mod artifact;
pub mod product;
pub mod proposal;
pub mod session;

pub use artifact::PosterArtifact;
pub use product::{AspectRatio, InvalidProduct, ProductInfo};
pub use proposal::{DisplayedText, IntegrationNotes, Proposal, MAX_DISPLAYED_FEATURES};
pub use session::{FinalPrompt, Session};

/// Generate a fresh opaque identifier (UUID v4, hyphenated).
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
