//! Key-value persistence abstractions for the posterforge pipeline.
//!
//! The pipeline stores proposal sets, cached final prompts, poster
//! metadata, and prompt templates as JSON strings behind the
//! [`SessionStore`] trait. Backends bring their own storage mechanism;
//! an in-memory implementation lives in `posterforge-state-memory`.

pub mod error;
pub mod key;
pub mod store;

pub use error::StateError;
pub use key::{proposal_lookup_keys, KeyKind, StoreKey};
pub use store::SessionStore;
