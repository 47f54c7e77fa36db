use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::ENSEMBLE_STATUS_HEADER;
use super::error::GatewayError;
use super::state::GatewayState;
use crate::catalog::CatalogItem;
use crate::images::ImageLoader;
use crate::pipeline::Recommendation;
use crate::store::{RecommendationRecord, RecommendationSink};
use crate::vision::VisionService;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Reference of the garment image, relative to the image root.
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub source_image: String,
    pub source_category: String,
    pub result_count: usize,
    pub recommendation: RecommendedItem,
}

#[derive(Debug, Serialize)]
pub struct RecommendedItem {
    pub item: CatalogItem,
    pub score: f32,
    pub confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub attempts: u32,
}

#[instrument(skip(state, request), fields(image = tracing::field::Empty))]
pub async fn recommendation_handler<V, L, S>(
    State(state): State<GatewayState<V, L, S>>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Response, GatewayError>
where
    V: VisionService + 'static,
    L: ImageLoader + 'static,
    S: RecommendationSink + 'static,
{
    let image_ref = request.image.trim();
    if image_ref.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "missing image reference".to_string(),
        ));
    }
    tracing::Span::current().record("image", tracing::field::display(image_ref));

    let recommendation = state.orchestrator.recommend(image_ref).await?;

    let record = RecommendationRecord::from_recommendation(image_ref, &recommendation);

    // Persistence is best-effort; the requester still gets the answer.
    if let Err(e) = state.store.record(&record).await {
        error!(error = %e, "Failed to persist recommendation record");
    }

    info!(
        item = recommendation.item.id,
        status = recommendation.verdict.as_status(),
        attempts = recommendation.attempts,
        "Recommendation resolved"
    );

    Ok(make_response(
        image_ref,
        record.id,
        record.timestamp,
        recommendation,
    ))
}

fn make_response(
    image_ref: &str,
    id: Uuid,
    timestamp: DateTime<Utc>,
    recommendation: Recommendation,
) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        ENSEMBLE_STATUS_HEADER,
        HeaderValue::from_static(recommendation.verdict.as_status()),
    );

    let body = RecommendationResponse {
        id,
        timestamp,
        source_image: image_ref.to_string(),
        source_category: recommendation.source_category.clone(),
        result_count: recommendation.result_count,
        recommendation: RecommendedItem {
            item: (*recommendation.item).clone(),
            score: recommendation.score,
            confirmed: recommendation.verdict.is_confirmed(),
            rationale: recommendation.verdict.rationale().map(str::to_string),
            attempts: recommendation.attempts,
        },
    };

    (StatusCode::OK, headers, Json(body)).into_response()
}

/// Lists the catalog's distinct categories, sorted.
#[instrument(skip(state))]
pub async fn categories_handler<V, L, S>(
    State(state): State<GatewayState<V, L, S>>,
) -> Json<Vec<String>>
where
    V: VisionService + 'static,
    L: ImageLoader + 'static,
    S: RecommendationSink + 'static,
{
    let categories = state
        .orchestrator
        .catalog()
        .distinct_categories()
        .into_iter()
        .collect();

    Json(categories)
}
