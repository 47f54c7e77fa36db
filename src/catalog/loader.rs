use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::error::CatalogError;
use super::index::CatalogIndex;
use super::model::{CatalogItem, Gender};

/// Raw JSONL row as stored on disk. The embedding arrives pre-serialized as
/// a JSON string and is parsed into floats here.
#[derive(Debug, Deserialize)]
struct RawCatalogRow {
    id: u64,
    gender: String,
    category: String,
    #[serde(default)]
    base_colour: String,
    #[serde(default)]
    usage: String,
    #[serde(default)]
    display_name: String,
    image: String,
    embedding: String,
}

/// Loads the catalog from a JSON-lines file.
///
/// The first valid row fixes the embedding dimensionality; rows that do not
/// match are skipped with a warning rather than padded or truncated. An
/// empty or all-invalid file is an error.
pub async fn load_catalog(path: &Path) -> Result<CatalogIndex, CatalogError> {
    let contents =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CatalogError::ReadFailed {
                path: path.display().to_string(),
                source: e,
            })?;

    let mut items: Vec<CatalogItem> = Vec::new();
    let mut expected_dim: Option<usize> = None;
    let mut skipped = 0usize;

    for (idx, raw_line) in contents.lines().enumerate() {
        let line = idx + 1;
        let raw_line = raw_line.trim();
        if raw_line.is_empty() {
            continue;
        }

        let row: RawCatalogRow = match serde_json::from_str(raw_line) {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "Skipping unparseable catalog row");
                skipped += 1;
                continue;
            }
        };

        let item = match parse_row(row, line) {
            Ok(item) => item,
            Err(e) => {
                warn!(line, error = %e, "Skipping invalid catalog row");
                skipped += 1;
                continue;
            }
        };

        match expected_dim {
            None => expected_dim = Some(item.embedding.len()),
            Some(dim) if dim != item.embedding.len() => {
                warn!(
                    line,
                    expected = dim,
                    actual = item.embedding.len(),
                    "Skipping catalog row with mismatched embedding dimension"
                );
                skipped += 1;
                continue;
            }
            Some(_) => {}
        }

        items.push(item);
    }

    if items.is_empty() {
        return Err(CatalogError::Empty {
            path: path.display().to_string(),
        });
    }

    info!(
        rows = items.len(),
        skipped,
        dim = expected_dim.unwrap_or(0),
        "Catalog loaded"
    );

    Ok(CatalogIndex::new(items))
}

fn parse_row(row: RawCatalogRow, line: usize) -> Result<CatalogItem, CatalogError> {
    let gender: Gender = row.gender.parse()?;

    let embedding: Vec<f32> =
        serde_json::from_str(&row.embedding).map_err(|e| CatalogError::InvalidRow {
            line,
            message: format!("embedding is not a JSON float array: {}", e),
        })?;

    if embedding.is_empty() {
        return Err(CatalogError::InvalidRow {
            line,
            message: "embedding is empty".to_string(),
        });
    }

    if row.image.trim().is_empty() {
        return Err(CatalogError::InvalidRow {
            line,
            message: "image reference is empty".to_string(),
        });
    }

    Ok(CatalogItem {
        id: row.id,
        gender,
        category: row.category,
        base_colour: row.base_colour,
        usage: row.usage,
        display_name: row.display_name,
        image: row.image,
        embedding,
    })
}
