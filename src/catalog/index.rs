use std::collections::BTreeSet;
use std::sync::Arc;

use super::model::{CatalogItem, Gender};

/// Read-only ordered view over catalog rows.
///
/// Filtering clones `Arc` handles into a new view; the underlying rows are
/// shared and never mutated, so views are cheap and safe to use from
/// concurrent requests without locking.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    rows: Vec<Arc<CatalogItem>>,
}

impl CatalogIndex {
    /// Builds an index over `items`, preserving their order.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            rows: items.into_iter().map(Arc::new).collect(),
        }
    }

    /// Rows in catalog order.
    pub fn rows(&self) -> &[Arc<CatalogItem>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a new view containing the rows matching `predicate`.
    /// Idempotent: filtering a filtered view by the same predicate yields
    /// the same set.
    pub fn filter<P>(&self, predicate: P) -> CatalogIndex
    where
        P: Fn(&CatalogItem) -> bool,
    {
        CatalogIndex {
            rows: self
                .rows
                .iter()
                .filter(|item| predicate(item))
                .map(Arc::clone)
                .collect(),
        }
    }

    /// Distinct category names, sorted.
    pub fn distinct_categories(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .map(|item| item.category.clone())
            .collect()
    }

    /// Candidate universe for one recommendation request: the gender must
    /// match the target (or be Unisex) and the category must differ from the
    /// source garment's own, so an item is never recommended as more of the
    /// same.
    pub fn complements_view(&self, target_gender: Gender, target_category: &str) -> CatalogIndex {
        self.filter(|item| {
            (item.gender == target_gender || item.gender == Gender::Unisex)
                && !item.category.eq_ignore_ascii_case(target_category)
        })
    }
}
