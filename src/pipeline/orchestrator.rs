use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::CatalogIndex;
use crate::extract::{self, OutfitSuggestion};
use crate::images::{ImageData, ImageLoader};
use crate::similarity::{self, RetrievalParams, SimilarityResult};
use crate::verify;
use crate::vision::VisionService;

use super::DEFAULT_MAX_RETRIES;
use super::error::RecommendError;
use super::types::{Recommendation, RecommendationVerdict};

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub retrieval: RetrievalParams,
    /// Additional retrieval/verification rounds after the first attempt.
    pub max_retries: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retrieval: RetrievalParams::default(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Drives one recommendation request end to end.
///
/// The catalog is shared, read-only state; everything else is per-request,
/// so a single orchestrator serves concurrent requests without locking. All
/// collaborator calls are issued sequentially within a request.
pub struct RecommendationOrchestrator<V, L> {
    catalog: CatalogIndex,
    vision: V,
    images: L,
    config: PipelineConfig,
}

impl<V, L> RecommendationOrchestrator<V, L>
where
    V: VisionService,
    L: ImageLoader,
{
    pub fn new(catalog: CatalogIndex, vision: V, images: L, config: PipelineConfig) -> Self {
        Self {
            catalog,
            vision,
            images,
            config,
        }
    }

    /// The full catalog this orchestrator serves from.
    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    /// Runs the full pipeline for the garment image at `source_ref`.
    pub async fn recommend(&self, source_ref: &str) -> Result<Recommendation, RecommendError> {
        let source = self.images.load(source_ref).await?;

        let categories = self.catalog.distinct_categories();
        let suggestion = extract::extract(&self.vision, &source, &categories).await?;

        info!(
            descriptions = suggestion.item_descriptions.len(),
            gender = %suggestion.target_gender,
            category = %suggestion.target_category,
            "Attributes extracted, filtering catalog"
        );

        // One candidate universe per request, reused across every retry.
        let universe = self
            .catalog
            .complements_view(suggestion.target_gender, &suggestion.target_category);

        if universe.is_empty() {
            return Err(RecommendError::EmptyCandidateSet {
                gender: suggestion.target_gender,
                category: suggestion.target_category,
            });
        }

        debug!(universe = universe.len(), "Candidate universe ready");

        let mut last_candidates: Vec<SimilarityResult> = Vec::new();
        let mut attempts = 0u32;

        while attempts <= self.config.max_retries {
            attempts += 1;

            // Retrieval is re-run from scratch on every attempt: the
            // embedding call is not deterministic, so a fresh pass can
            // surface different or differently-ranked candidates. Do not
            // cache the first attempt's list.
            let candidates = self.retrieve_candidates(&suggestion, &universe).await;

            debug!(
                attempt = attempts,
                candidates = candidates.len(),
                "Retrieval attempt complete"
            );

            if let Some(confirmed) = self
                .verify_candidates(&source, &candidates, attempts, &suggestion)
                .await
            {
                return Ok(confirmed);
            }

            if !candidates.is_empty() {
                last_candidates = candidates;
            }
        }

        let result_count = last_candidates.len();
        match last_candidates.into_iter().next() {
            Some(first) => {
                info!(
                    item = first.item.id,
                    score = first.score,
                    "Retries exhausted, returning unconfirmed fallback"
                );
                Ok(Recommendation {
                    item: first.item,
                    score: first.score,
                    verdict: RecommendationVerdict::Unconfirmed,
                    attempts,
                    result_count,
                    source_category: suggestion.target_category,
                })
            }
            None => Err(RecommendError::EmptyCandidateSet {
                gender: suggestion.target_gender,
                category: suggestion.target_category,
            }),
        }
    }

    /// One retrieval attempt: every item description queries the universe
    /// independently; per-description results are concatenated in order and
    /// deliberately not deduplicated.
    async fn retrieve_candidates(
        &self,
        suggestion: &OutfitSuggestion,
        universe: &CatalogIndex,
    ) -> Vec<SimilarityResult> {
        let mut candidates = Vec::new();

        for description in &suggestion.item_descriptions {
            let vectors = match self.vision.embed(std::slice::from_ref(description)).await {
                Ok(vectors) => vectors,
                Err(e) => {
                    warn!(
                        error = %e,
                        description = %description,
                        "Embedding call failed; description contributes no candidates"
                    );
                    continue;
                }
            };

            let Some(query) = vectors.into_iter().next() else {
                warn!(description = %description, "Embedding call returned no vector");
                continue;
            };

            candidates.extend(similarity::retrieve(
                &query,
                universe,
                &self.config.retrieval,
            ));
        }

        candidates
    }

    /// Verifies candidates in order and resolves on the first yes. A
    /// candidate whose image cannot be read is skipped, not fatal.
    async fn verify_candidates(
        &self,
        source: &ImageData,
        candidates: &[SimilarityResult],
        attempts: u32,
        suggestion: &OutfitSuggestion,
    ) -> Option<Recommendation> {
        for candidate in candidates {
            let image = match self.images.load(&candidate.item.image).await {
                Ok(image) => image,
                Err(e) => {
                    warn!(
                        item = candidate.item.id,
                        error = %e,
                        "Candidate image unavailable, skipping"
                    );
                    continue;
                }
            };

            let verdict = verify::verify(&self.vision, source, &image).await;
            if verdict.approved {
                info!(
                    item = candidate.item.id,
                    score = candidate.score,
                    attempt = attempts,
                    "Candidate confirmed"
                );
                return Some(Recommendation {
                    item: Arc::clone(&candidate.item),
                    score: candidate.score,
                    verdict: RecommendationVerdict::Confirmed {
                        rationale: verdict.rationale,
                    },
                    attempts,
                    result_count: candidates.len(),
                    source_category: suggestion.target_category.clone(),
                });
            }
        }

        None
    }
}
