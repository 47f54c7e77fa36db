use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use super::client::VisionService;
use super::error::VisionError;
use crate::images::ImageData;

/// Scripted [`VisionService`] for tests.
///
/// Embeddings are looked up per text (with an optional default); `reason`
/// replies come from a FIFO queue so each external call in a scenario can be
/// scripted individually, including failures.
#[derive(Default)]
pub struct MockVisionService {
    embeddings: Mutex<HashMap<String, Vec<f32>>>,
    default_embedding: Mutex<Option<Vec<f32>>>,
    reason_replies: Mutex<VecDeque<Result<Value, VisionError>>>,
    embed_calls: AtomicUsize,
    reason_calls: AtomicUsize,
}

impl MockVisionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the embedding returned for `text`.
    pub fn with_embedding(self, text: &str, vector: Vec<f32>) -> Self {
        self.embeddings.lock().insert(text.to_string(), vector);
        self
    }

    /// Scripts a fallback embedding for texts without a dedicated entry.
    pub fn with_default_embedding(self, vector: Vec<f32>) -> Self {
        *self.default_embedding.lock() = Some(vector);
        self
    }

    /// Queues the next `reason` reply.
    pub fn push_reason(&self, reply: Value) {
        self.reason_replies.lock().push_back(Ok(reply));
    }

    /// Queues a failing `reason` call.
    pub fn push_reason_error(&self, error: VisionError) {
        self.reason_replies.lock().push_back(Err(error));
    }

    /// Number of `embed` calls made so far.
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    /// Number of `reason` calls made so far.
    pub fn reason_calls(&self) -> usize {
        self.reason_calls.load(Ordering::SeqCst)
    }
}

impl VisionService for MockVisionService {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, VisionError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);

        let embeddings = self.embeddings.lock();
        let default = self.default_embedding.lock();

        texts
            .iter()
            .map(|text| {
                embeddings
                    .get(text)
                    .cloned()
                    .or_else(|| default.clone())
                    .ok_or_else(|| VisionError::RequestFailed {
                        endpoint: "embeddings",
                        message: format!("no scripted embedding for '{}'", text),
                    })
            })
            .collect()
    }

    async fn reason(&self, _images: &[&ImageData], _instruction: &str) -> Result<Value, VisionError> {
        self.reason_calls.fetch_add(1, Ordering::SeqCst);

        self.reason_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(VisionError::RequestFailed {
                    endpoint: "chat/completions",
                    message: "no scripted reply".to_string(),
                })
            })
    }
}
