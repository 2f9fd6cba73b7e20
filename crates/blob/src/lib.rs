//! Pluggable blob storage for product photos and generated posters.
//!
//! The pipeline only needs three operations: write fresh bytes under a
//! name, read bytes back by reference, and copy an existing blob to a new
//! name (the degraded-fallback path copies the source photo into the
//! poster slot without ever loading it through the model).

pub mod error;
pub mod fs;
pub mod memory;
pub mod store;

pub use error::BlobError;
pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use store::BlobStore;
