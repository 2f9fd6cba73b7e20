//! Marketing-poster generation pipeline.
//!
//! Three stages, each usable on its own:
//!
//! 1. [`ProposalGenerator`] turns product metadata into 3-5 stored poster
//!    design proposals (one structured text-model call, built-in defaults
//!    when the output is unusable).
//! 2. [`PromptSynthesizer`] turns a proposal selection into the final
//!    image prompt: deterministic base prompt, best-effort enhancement,
//!    literal repair, and a per-selection cache.
//! 3. [`PosterGenerator`] renders the poster with linear-backoff retries
//!    and degrades to copying the source photo when the model cannot
//!    deliver an image.
//!
//! Model clients, session storage, and blob storage are all trait-object
//! seams, so the whole pipeline runs against in-memory fakes in tests.

pub mod defaults;
pub mod error;
pub mod generator;
pub mod literals;
pub mod phase;
pub mod prompt;
pub mod proposals;
pub mod templates;
pub mod types;

pub use error::PipelineError;
pub use generator::PosterGenerator;
pub use prompt::PromptSynthesizer;
pub use proposals::ProposalGenerator;
pub use types::{GenerateRequest, GenerateResponse, PromptTemplate, RetryPolicy};
