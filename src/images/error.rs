use thiserror::Error;

#[derive(Debug, Error)]
/// Image access failures, distinguished so callers can surface them
/// separately.
pub enum ImageError {
    /// No file exists behind the reference.
    #[error("image not found: '{reference}'")]
    NotFound {
        /// The requested reference.
        reference: String,
    },

    /// The file exists but cannot be read.
    #[error("permission denied reading image '{reference}'")]
    PermissionDenied {
        /// The requested reference.
        reference: String,
    },

    /// The reference resolves to something other than a regular file.
    #[error("image reference '{reference}' is not a regular file")]
    NotAFile {
        /// The requested reference.
        reference: String,
    },

    /// The reference would escape the configured image root.
    #[error("image reference '{reference}' escapes the image root")]
    OutsideRoot {
        /// The requested reference.
        reference: String,
    },

    /// Any other io failure.
    #[error("failed to read image '{reference}': {source}")]
    Io {
        /// The requested reference.
        reference: String,
        /// Underlying io error.
        #[source]
        source: std::io::Error,
    },
}

impl ImageError {
    pub(crate) fn from_io(reference: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => ImageError::NotFound {
                reference: reference.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => ImageError::PermissionDenied {
                reference: reference.to_string(),
            },
            _ => ImageError::Io {
                reference: reference.to_string(),
                source,
            },
        }
    }
}
