//! Generative model client contracts and implementations.
//!
//! The pipeline talks to two model surfaces: a text model (design
//! proposals, prompt enhancement, optionally schema-guided) and a
//! multimodal image model (final poster render from a prompt plus a
//! reference photo). Both are traits so tests can substitute mocks;
//! the shipped implementations speak the Gemini `generateContent` wire
//! format over HTTP.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gemini;
pub mod mock;

pub use client::{ImageGeneration, ImageModelClient, ResponsePart, TextGeneration, TextModelClient};
pub use config::ModelConfig;
pub use error::ModelError;
pub use fetch::{HttpImageFetcher, ImageFetcher};
pub use gemini::{GeminiImageModel, GeminiTextModel};
