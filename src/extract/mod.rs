//! Structured attribute extraction from a source garment image.


use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::Gender;
use crate::images::ImageData;
use crate::vision::{VisionError, VisionService};

/// Complementary-outfit plan derived from the source image.
///
/// Produced once per recommendation request, consumed immediately by the
/// orchestrator, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct OutfitSuggestion {
    /// One free-text description per complementary garment; each drives an
    /// independent retrieval query.
    pub item_descriptions: Vec<String>,
    /// Category of the source garment itself, excluded from candidates.
    pub target_category: String,
    /// Audience the recommendation should target.
    pub target_gender: Gender,
}

#[derive(Debug, Error)]
/// Extraction failures. All of these abort the recommendation request
/// before any catalog work happens.
pub enum ExtractError {
    /// The vision service call itself failed.
    #[error("vision service call failed: {0}")]
    Service(#[from] VisionError),

    /// The reply did not match the expected three-field shape.
    #[error("malformed extraction response: {reason}")]
    Malformed {
        /// What failed to parse or validate.
        reason: String,
    },

    /// The reply named a category the catalog does not contain.
    #[error("extracted category '{category}' is not in the catalog")]
    UnknownCategory {
        /// The offending category.
        category: String,
    },
}

/// Expected reply shape. Anything else is a recoverable error that aborts
/// the request with no partial processing.
#[derive(Debug, Deserialize)]
struct RawSuggestion {
    items: Vec<String>,
    category: String,
    gender: String,
}

fn build_instruction(known_categories: &BTreeSet<String>) -> String {
    let categories: Vec<&str> = known_categories.iter().map(String::as_str).collect();

    format!(
        "You are a fashion stylist. Look at the garment in the image and suggest \
         clothing items that would complete the outfit. Reply with a JSON object of \
         the shape {{\"items\": [string, ...], \"category\": string, \"gender\": string}}. \
         \"items\" is a list of short descriptions, one per complementary garment. \
         \"category\" is the category of the garment shown, chosen strictly from: {}. \
         \"gender\" is one of: Men, Women, Boys, Girls, Unisex.",
        categories.join(", ")
    )
}

/// Asks the vision service for a complementary-outfit plan.
///
/// The reply is untrusted: missing fields, an empty item list, a category
/// outside `known_categories`, or an unrecognized gender all fail the call.
pub async fn extract<V: VisionService>(
    vision: &V,
    image: &ImageData,
    known_categories: &BTreeSet<String>,
) -> Result<OutfitSuggestion, ExtractError> {
    let instruction = build_instruction(known_categories);
    let reply = vision.reason(&[image], &instruction).await?;

    let raw: RawSuggestion =
        serde_json::from_value(reply).map_err(|e| ExtractError::Malformed {
            reason: e.to_string(),
        })?;

    let item_descriptions: Vec<String> = raw
        .items
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();

    if item_descriptions.is_empty() {
        return Err(ExtractError::Malformed {
            reason: "no item descriptions".to_string(),
        });
    }

    let target_category = raw.category.trim().to_string();
    let category_known = known_categories
        .iter()
        .any(|c| c.eq_ignore_ascii_case(&target_category));
    if !category_known {
        return Err(ExtractError::UnknownCategory {
            category: target_category,
        });
    }

    let target_gender: Gender = raw.gender.parse().map_err(|_| ExtractError::Malformed {
        reason: format!("unrecognized gender '{}'", raw.gender.trim()),
    })?;

    debug!(
        items = item_descriptions.len(),
        category = %target_category,
        gender = %target_gender,
        "Attributes extracted"
    );

    Ok(OutfitSuggestion {
        item_descriptions,
        target_category,
        target_gender,
    })
}
