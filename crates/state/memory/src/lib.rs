//! In-memory [`SessionStore`](posterforge_state::SessionStore) backend.
//!
//! Intended for tests and single-process embedders; production deployments
//! bring a durable backend behind the same trait.

mod store;

pub use store::MemorySessionStore;
