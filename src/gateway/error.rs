use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::ENSEMBLE_STATUS_HEADER;
use crate::images::ImageError;
use crate::pipeline::RecommendError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Recommend(#[from] RecommendError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, error_message, ensemble_status) = match &self {
            GatewayError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string(), "invalid_request")
            }
            GatewayError::Recommend(RecommendError::Extraction(_)) => {
                (StatusCode::BAD_GATEWAY, self.to_string(), "extraction_error")
            }
            GatewayError::Recommend(RecommendError::SourceImage(image_error)) => {
                match image_error {
                    ImageError::NotFound { .. } => {
                        (StatusCode::NOT_FOUND, self.to_string(), "image_not_found")
                    }
                    ImageError::PermissionDenied { .. } => {
                        (StatusCode::FORBIDDEN, self.to_string(), "image_forbidden")
                    }
                    ImageError::NotAFile { .. } | ImageError::OutsideRoot { .. } => (
                        StatusCode::BAD_REQUEST,
                        self.to_string(),
                        "invalid_image_reference",
                    ),
                    ImageError::Io { .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        self.to_string(),
                        "image_io_error",
                    ),
                }
            }
            GatewayError::Recommend(RecommendError::EmptyCandidateSet { .. }) => (
                StatusCode::NOT_FOUND,
                "no recommendation available for this garment".to_string(),
                "no_recommendation",
            ),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            ENSEMBLE_STATUS_HEADER,
            HeaderValue::from_str(ensemble_status).unwrap_or(HeaderValue::from_static("error")),
        );

        let body = Json(ErrorResponse {
            error: error_message,
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
