use std::path::Path;
use std::sync::Arc;

use crate::{
    build_hierarchy, load_locations, query_listings, CategoryCatalog, CoreError, CountryNode,
    DataError, ListingQuery, LocationRecord, QueryResult,
};

/// Read-only record set with its location tree, built once at startup.
#[derive(Debug, Clone)]
pub struct ListingStore {
    records: Arc<[LocationRecord]>,
    hierarchy: Arc<[CountryNode]>,
}

impl ListingStore {
    #[must_use]
    pub fn from_records(records: Vec<LocationRecord>) -> Self {
        let hierarchy = build_hierarchy(&records);
        Self {
            records: Arc::from(records),
            hierarchy: Arc::from(hierarchy),
        }
    }

    /// Load the locations data file and derive the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let file = load_locations(path)?;
        Ok(Self::from_records(file.locations))
    }

    #[must_use]
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Shared handle to the hierarchy, cheap to hand to a [`crate::LocationFilter`].
    #[must_use]
    pub fn hierarchy(&self) -> Arc<[CountryNode]> {
        Arc::clone(&self.hierarchy)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCategory`] if the query names a category
    /// missing from `catalog`.
    pub fn query(
        &self,
        catalog: &CategoryCatalog,
        query: &ListingQuery,
    ) -> Result<QueryResult, CoreError> {
        query_listings(&self.records, catalog, query)
    }
}
