//! Typed in-memory clothing catalog.
//!
//! The catalog is loaded once at startup and shared read-only across
//! requests; all "filtering" produces new views over the same rows.

pub mod error;
pub mod index;
pub mod loader;
pub mod model;

#[cfg(test)]
mod tests;

pub use error::CatalogError;
pub use index::CatalogIndex;
pub use loader::load_catalog;
pub use model::{CatalogItem, Gender};
