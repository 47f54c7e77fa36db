//! Pairwise outfit verification against the vision service.


use serde::Deserialize;
use tracing::{debug, warn};

use crate::images::ImageData;
use crate::vision::VisionService;

/// Verifier verdict for one source/candidate image pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// `true` if the verifier confirmed the pairing.
    pub approved: bool,
    /// The verifier's stated reason.
    pub rationale: String,
}

const INSTRUCTION: &str = "You are a fashion stylist. The first image shows a garment a \
    customer already has; the second shows a candidate item. Would the two work together \
    as part of one outfit? Reply with a JSON object of the shape \
    {\"match\": boolean, \"reason\": string}.";

const FAIL_CLOSED_RATIONALE: &str = "verifier response could not be interpreted";

#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(rename = "match")]
    is_match: bool,
    #[serde(default)]
    reason: String,
}

/// Asks whether `candidate` complements `reference` in one outfit.
///
/// Fail-closed: a transport error or malformed reply is reported as a "no"
/// verdict rather than an error, so one bad call never aborts the caller's
/// retry loop.
pub async fn verify<V: VisionService>(
    vision: &V,
    reference: &ImageData,
    candidate: &ImageData,
) -> Verdict {
    let reply = match vision.reason(&[reference, candidate], INSTRUCTION).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "Verification call failed, treating as a no");
            return fail_closed();
        }
    };

    match serde_json::from_value::<RawVerdict>(reply) {
        Ok(raw) => {
            debug!(approved = raw.is_match, "Verifier verdict");
            Verdict {
                approved: raw.is_match,
                rationale: raw.reason,
            }
        }
        Err(e) => {
            warn!(error = %e, "Malformed verifier reply, treating as a no");
            fail_closed()
        }
    }
}

fn fail_closed() -> Verdict {
    Verdict {
        approved: false,
        rationale: FAIL_CLOSED_RATIONALE.to_string(),
    }
}
