use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading or interpreting catalog rows.
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog at '{path}': {source}")]
    ReadFailed {
        /// Catalog file path.
        path: String,
        /// Underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// A row failed validation.
    #[error("invalid catalog row at line {line}: {message}")]
    InvalidRow {
        /// 1-based line number in the catalog file.
        line: usize,
        /// What was wrong with the row.
        message: String,
    },

    /// A gender string did not match the five-value enumeration.
    #[error("unknown gender value: '{value}'")]
    UnknownGender {
        /// The offending value.
        value: String,
    },

    /// No row survived validation.
    #[error("catalog at '{path}' contained no valid rows")]
    Empty {
        /// Catalog file path.
        path: String,
    },
}
