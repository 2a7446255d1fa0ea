// src/listing/static_listing.rs
use anyhow::Result;
use std::future::Future;
use std::path::Path;
use tracing::debug;

use super::ListingProvider;
use crate::core::error::FetchError;
use crate::filter::Record;
use crate::types::category::{default_catalog, load_catalog, Category};

/// Read-only table handed over at construction
#[derive(Debug, Clone)]
pub struct StaticListing<R> {
    records: Vec<R>,
}

impl<R> StaticListing<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StaticListing<Category> {
    /// The built-in medical specialty table
    pub fn categories() -> Self {
        Self::new(default_catalog())
    }

    pub fn from_catalog_file(path: &Path) -> Result<Self> {
        Ok(Self::new(load_catalog(path)?))
    }
}

impl<R> ListingProvider for StaticListing<R>
where
    R: Record + Clone + Send + Sync,
{
    type Record = R;

    fn load(&self) -> impl Future<Output = Result<Vec<R>, FetchError>> + Send {
        async move {
            debug!("Serving {} static records", self.records.len());
            Ok(self.records.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{apply, FacetSelection, FilterState};

    #[tokio::test]
    async fn test_load_returns_whole_table() {
        let listing = StaticListing::categories();
        let loaded = listing.load().await.unwrap();
        assert_eq!(loaded.len(), 14);
        assert_eq!(loaded, listing.records());
    }

    #[tokio::test]
    async fn test_load_is_repeatable() {
        let listing = StaticListing::new(vec![Category::new(
            "x",
            "X-Ray",
            "Imaging",
            "",
            &["Imaging"],
        )]);
        assert_eq!(listing.load().await.unwrap(), listing.load().await.unwrap());
    }

    #[test]
    fn test_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.yaml");
        std::fs::write(
            &path,
            "categories:\n  - id: icu\n    name: Intensive Care\n    desc: Critical care units\n    tags: [Critical, Nursing]\n",
        )
        .unwrap();

        let listing = StaticListing::from_catalog_file(&path).unwrap();
        assert_eq!(listing.len(), 1);

        let state = FilterState::new().with_selection(
            "tags",
            FacetSelection::AnyOf(["Nursing".to_string()].into()),
        );
        assert_eq!(apply(listing.records(), &state).len(), 1);
    }
}
