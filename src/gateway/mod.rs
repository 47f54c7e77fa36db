//! HTTP gateway (Axum) for the recommendation pipeline.
//!
//! This module is primarily used by the `ensemble` server binary.

pub mod error;
pub mod handler;
pub mod state;


use std::path::Path;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use error::{ErrorResponse, GatewayError};
pub use handler::{categories_handler, recommendation_handler};
pub use state::GatewayState;

use crate::images::ImageLoader;
use crate::store::RecommendationSink;
use crate::vision::VisionService;

/// Response header mirroring how a request was resolved.
pub const ENSEMBLE_STATUS_HEADER: &str = "x-ensemble-status";
pub const ENSEMBLE_STATUS_HEALTHY: &str = "healthy";
pub const ENSEMBLE_STATUS_READY: &str = "ready";
pub const ENSEMBLE_STATUS_ERROR: &str = "error";

pub fn create_router_with_state<V, L, S>(
    state: GatewayState<V, L, S>,
    static_dir: &Path,
) -> Router
where
    V: VisionService + 'static,
    L: ImageLoader + 'static,
    S: RecommendationSink + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/categories", get(categories_handler))
        .route("/recommendation", post(recommendation_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub catalog: &'static str,
    pub catalog_items: usize,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        ENSEMBLE_STATUS_HEADER,
        HeaderValue::from_static(ENSEMBLE_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<V, L, S>(State(state): State<GatewayState<V, L, S>>) -> Response
where
    V: VisionService + 'static,
    L: ImageLoader + 'static,
    S: RecommendationSink + 'static,
{
    let catalog = state.orchestrator.catalog();

    let catalog_status = if catalog.is_empty() {
        ENSEMBLE_STATUS_ERROR
    } else {
        ENSEMBLE_STATUS_READY
    };

    let components = ComponentStatus {
        http: ENSEMBLE_STATUS_READY,
        catalog: catalog_status,
        catalog_items: catalog.len(),
    };

    let is_ready = components.catalog == ENSEMBLE_STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(
        ENSEMBLE_STATUS_HEADER,
        HeaderValue::from_str(status_msg).unwrap_or(HeaderValue::from_static("error")),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
