use thiserror::Error;

use crate::catalog::Gender;
use crate::extract::ExtractError;
use crate::images::ImageError;

#[derive(Debug, Error)]
/// Terminal pipeline failures. Non-terminal conditions (a failed
/// verification call, a candidate image that cannot be read) are absorbed
/// inside the retry loop and never surface here.
pub enum RecommendError {
    /// Attribute extraction failed before any catalog work happened.
    #[error("attribute extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    /// The source image could not be read.
    #[error("source image unavailable: {0}")]
    SourceImage(#[from] ImageError),

    /// No catalog rows survived filtering, or no retrieval attempt produced
    /// a candidate even after all retries.
    #[error("no recommendation available for {gender} outside '{category}'")]
    EmptyCandidateSet {
        /// Target gender of the request.
        gender: Gender,
        /// Category excluded from candidates.
        category: String,
    },
}
