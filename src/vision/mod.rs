//! Boundary to the external vision-reasoning and embedding service.
//!
//! The service is an opaque collaborator reached over a textual
//! request/response contract; everything it returns is untrusted and parsed
//! through explicit serde schemas before use.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{OpenAiVision, VisionService};
pub use error::VisionError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVisionService;

/// Embedding model used when none is configured (the same model the catalog
/// embeddings were generated with).
pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-large";

/// Vision-capable chat model used when none is configured.
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
