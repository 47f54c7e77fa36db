//! Persistence for resolved recommendations.
//!
//! Every successful pipeline run is appended to a JSON Lines file so the
//! history survives restarts and stays greppable. Persistence is best-effort
//! from the gateway's perspective: a write failure is logged, never surfaced
//! to the requester.

pub mod error;

#[cfg(any(test, feature = "mock"))]
mod memory;


pub use error::StoreError;
#[cfg(any(test, feature = "mock"))]
pub use memory::MemorySink;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::pipeline::Recommendation;

/// One persisted recommendation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Reference of the garment image the request was made for.
    pub source_image: String,
    /// Category extracted for that garment.
    pub source_category: String,
    /// Candidates retrieved on the attempt that resolved the request.
    pub result_count: usize,
    pub item_id: u64,
    pub item_name: String,
    pub score: f32,
    pub confirmed: bool,
    /// Verifier rationale; absent on fallback results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub attempts: u32,
}

impl RecommendationRecord {
    /// Builds a record for `recommendation`, stamping a fresh id and the
    /// current time.
    pub fn from_recommendation(source_image: &str, recommendation: &Recommendation) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source_image: source_image.to_string(),
            source_category: recommendation.source_category.clone(),
            result_count: recommendation.result_count,
            item_id: recommendation.item.id,
            item_name: recommendation.item.display_name.clone(),
            score: recommendation.score,
            confirmed: recommendation.verdict.is_confirmed(),
            rationale: recommendation.verdict.rationale().map(str::to_string),
            attempts: recommendation.attempts,
        }
    }
}

/// Destination for resolved recommendations.
pub trait RecommendationSink: Send + Sync {
    /// Appends one record.
    fn record(
        &self,
        record: &RecommendationRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

impl<T: RecommendationSink> RecommendationSink for std::sync::Arc<T> {
    async fn record(&self, record: &RecommendationRecord) -> Result<(), StoreError> {
        (**self).record(record).await
    }
}

/// Appends records to a JSON Lines file, one object per line.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecommendationSink for JsonlStore {
    async fn record(&self, record: &RecommendationRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::AppendFailed {
                path: self.path.clone(),
                source: e,
            })?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::AppendFailed {
                path: self.path.clone(),
                source: e,
            })?;

        debug!(id = %record.id, path = %self.path.display(), "Record appended");

        Ok(())
    }
}
