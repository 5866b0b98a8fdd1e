//! Agrirent generative-service adapter.
//!
//! Implements the [`pipeline::GenerationClient`] trait for Google's Gemini API.
//! Additional providers are added as new `impl` blocks in this crate without
//! any changes to the `pipeline` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, response envelope
//! parsing, and `Retry-After` extraction live here. The [`pipeline`] crate
//! sees only [`pipeline::GenerationClient`] and the raw text it returns; it
//! validates that text itself.

mod gemini;
mod wire;

pub use gemini::{GeminiConfig, GeminiProvider, ProviderError};
