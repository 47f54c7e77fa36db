//! Filesystem image access for the pipeline.

pub mod error;


pub use error::ImageError;

use std::path::{Component, Path, PathBuf};

use base64::Engine;

/// Raw image bytes plus the MIME type inferred from the file extension.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime: &'static str) -> Self {
        Self { bytes, mime }
    }

    /// Encodes the image as a `data:` URL for the vision API.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime, encoded)
    }
}

/// Async image source. `reference` is whatever the catalog row (or the
/// caller) carries, typically a path relative to the image root.
pub trait ImageLoader: Send + Sync {
    /// Loads the image behind `reference`.
    fn load(
        &self,
        reference: &str,
    ) -> impl std::future::Future<Output = Result<ImageData, ImageError>> + Send;
}

impl<T: ImageLoader> ImageLoader for std::sync::Arc<T> {
    async fn load(&self, reference: &str) -> Result<ImageData, ImageError> {
        (**self).load(reference).await
    }
}

/// Loads images from a root directory, rejecting references that escape it.
#[derive(Debug, Clone)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, ImageError> {
        let candidate = Path::new(reference);

        let escapes = candidate.is_absolute()
            || candidate
                .components()
                .any(|c| matches!(c, Component::ParentDir));
        if escapes {
            return Err(ImageError::OutsideRoot {
                reference: reference.to_string(),
            });
        }

        Ok(self.root.join(candidate))
    }
}

impl ImageLoader for FsImageLoader {
    async fn load(&self, reference: &str) -> Result<ImageData, ImageError> {
        let path = self.resolve(reference)?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ImageError::from_io(reference, e))?;
        if !metadata.is_file() {
            return Err(ImageError::NotAFile {
                reference: reference.to_string(),
            });
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ImageError::from_io(reference, e))?;

        Ok(ImageData::new(bytes, mime_for_path(&path)))
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}
