//! Ensemble library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`CatalogIndex`], [`CatalogItem`], [`Gender`] - The item catalog
//! - [`RecommendationOrchestrator`], [`Recommendation`] - The pipeline
//!
//! ## Retrieval & Verification
//! - [`cosine_similarity`], [`retrieve`], [`RetrievalParams`] - Embedding retrieval
//! - [`VisionService`], [`OpenAiVision`] - Embedding and vision reasoning calls
//! - [`OutfitSuggestion`] - Attributes extracted from the source garment
//! - [`Verdict`] - Vision verification outcome
//!
//! ## Serving
//! - Gateway router and handlers live in [`gateway`]
//! - [`RecommendationSink`], [`JsonlStore`] - Result persistence
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod config;
pub mod extract;
pub mod gateway;
pub mod images;
pub mod pipeline;
pub mod similarity;
pub mod store;
pub mod verify;
pub mod vision;

pub use catalog::{CatalogError, CatalogIndex, CatalogItem, Gender, load_catalog};
pub use config::{Config, ConfigError};
pub use extract::{ExtractError, OutfitSuggestion, extract};
pub use images::{FsImageLoader, ImageData, ImageError, ImageLoader};
pub use pipeline::{
    DEFAULT_MAX_RETRIES, PipelineConfig, Recommendation, RecommendationOrchestrator,
    RecommendationVerdict, RecommendError,
};
pub use similarity::{
    DEFAULT_SCORE_THRESHOLD, DEFAULT_TOP_K, RetrievalParams, SimilarityResult, cosine_similarity,
    retrieve,
};
pub use store::{JsonlStore, RecommendationRecord, RecommendationSink, StoreError};
#[cfg(any(test, feature = "mock"))]
pub use store::MemorySink;
pub use verify::{Verdict, verify};
#[cfg(any(test, feature = "mock"))]
pub use vision::MockVisionService;
pub use vision::{
    DEFAULT_API_BASE, DEFAULT_EMBED_MODEL, DEFAULT_VISION_MODEL, OpenAiVision, VisionError,
    VisionService,
};
