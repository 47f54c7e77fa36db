//! Recommendation state machine: extract → filter → retrieve → verify →
//! resolve.

pub mod error;
pub mod orchestrator;
pub mod types;


pub use error::RecommendError;
pub use orchestrator::{PipelineConfig, RecommendationOrchestrator};
pub use types::{Recommendation, RecommendationVerdict};

/// Additional retrieval/verification rounds after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;
