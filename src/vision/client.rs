use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::VisionError;
use crate::images::ImageData;

/// Async interface to the reasoning/embedding collaborator.
///
/// Both operations are blocking, latency-bearing calls from the pipeline's
/// perspective; per-call timeouts live behind this boundary, not in the
/// orchestrator's retry logic.
pub trait VisionService: Send + Sync {
    /// Embeds each text into a fixed-length vector, order-preserving: one
    /// vector per input text.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, VisionError>> + Send;

    /// Sends one or more images plus a natural-language instruction and
    /// returns the model's structured JSON reply. The reply is untrusted;
    /// callers parse it defensively.
    fn reason(
        &self,
        images: &[&ImageData],
        instruction: &str,
    ) -> impl std::future::Future<Output = Result<Value, VisionError>> + Send;
}

impl<T: VisionService> VisionService for std::sync::Arc<T> {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, VisionError> {
        (**self).embed(texts).await
    }

    async fn reason(&self, images: &[&ImageData], instruction: &str) -> Result<Value, VisionError> {
        (**self).reason(images, instruction).await
    }
}

/// OpenAI-compatible REST client backing [`VisionService`] in production.
#[derive(Debug, Clone)]
pub struct OpenAiVision {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    embed_model: String,
    vision_model: String,
}

impl OpenAiVision {
    /// Builds a client for `api_base` with a per-request `timeout`.
    pub fn new(
        api_base: &str,
        api_key: &str,
        embed_model: &str,
        vision_model: &str,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::ClientBuildFailed {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            embed_model: embed_model.to_string(),
            vision_model: vision_model.to_string(),
        })
    }

    /// Returns the configured base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl VisionService for OpenAiVision {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, VisionError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.api_base);
        let body = EmbeddingsRequest {
            model: &self.embed_model,
            input: texts,
            encoding_format: "float",
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionError::RequestFailed {
                endpoint: "embeddings",
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(VisionError::UpstreamStatus {
                endpoint: "embeddings",
                status: status.as_u16(),
            });
        }

        let parsed: EmbeddingsResponse =
            response
                .json()
                .await
                .map_err(|e| VisionError::MalformedResponse {
                    endpoint: "embeddings",
                    message: e.to_string(),
                })?;

        if parsed.data.len() != texts.len() {
            return Err(VisionError::MalformedResponse {
                endpoint: "embeddings",
                message: format!(
                    "expected {} vectors, got {}",
                    texts.len(),
                    parsed.data.len()
                ),
            });
        }

        debug!(texts = texts.len(), "Embeddings received");

        Ok(parsed.data.into_iter().map(|row| row.embedding).collect())
    }

    async fn reason(&self, images: &[&ImageData], instruction: &str) -> Result<Value, VisionError> {
        let url = format!("{}/chat/completions", self.api_base);

        let mut content = vec![serde_json::json!({ "type": "text", "text": instruction })];
        for image in images {
            content.push(serde_json::json!({
                "type": "image_url",
                "image_url": { "url": image.to_data_url() }
            }));
        }

        let body = serde_json::json!({
            "model": self.vision_model,
            "messages": [{ "role": "user", "content": content }],
            "response_format": { "type": "json_object" },
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionError::RequestFailed {
                endpoint: "chat/completions",
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(VisionError::UpstreamStatus {
                endpoint: "chat/completions",
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| VisionError::MalformedResponse {
                    endpoint: "chat/completions",
                    message: e.to_string(),
                })?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| VisionError::MalformedResponse {
                endpoint: "chat/completions",
                message: "response contained no message content".to_string(),
            })?;

        debug!(reply_len = reply.len(), "Vision reply received");

        serde_json::from_str(&reply).map_err(|e| VisionError::MalformedResponse {
            endpoint: "chat/completions",
            message: format!("reply is not valid JSON: {}", e),
        })
    }
}
