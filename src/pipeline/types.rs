use std::sync::Arc;

use crate::catalog::CatalogItem;

/// How the final recommendation was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationVerdict {
    /// The vision verifier confirmed the pairing.
    Confirmed {
        /// The verifier's stated reason.
        rationale: String,
    },
    /// Retries were exhausted; this is the best-ranked candidate of the
    /// last attempt that retrieved anything, explicitly unconfirmed.
    Unconfirmed,
}

impl RecommendationVerdict {
    /// Returns `true` for a verifier-confirmed pairing.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, RecommendationVerdict::Confirmed { .. })
    }

    /// The verifier's rationale (confirmed results only).
    pub fn rationale(&self) -> Option<&str> {
        match self {
            RecommendationVerdict::Confirmed { rationale } => Some(rationale),
            RecommendationVerdict::Unconfirmed => None,
        }
    }

    /// Short status string for response headers and logs.
    pub fn as_status(&self) -> &'static str {
        match self {
            RecommendationVerdict::Confirmed { .. } => "confirmed",
            RecommendationVerdict::Unconfirmed => "fallback",
        }
    }
}

/// Final answer for one recommendation request. Created by the
/// orchestrator, returned to the caller; nothing is shared across requests.
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// The recommended catalog item.
    pub item: Arc<CatalogItem>,
    /// Cosine similarity between the retrieval query and the item.
    pub score: f32,
    pub verdict: RecommendationVerdict,
    /// Attempts used, 1-based; at most `max_retries + 1`.
    pub attempts: u32,
    /// Candidates retrieved on the attempt that produced this answer.
    pub result_count: usize,
    /// Category extracted for the source garment (metadata for consumers).
    pub source_category: String,
}
