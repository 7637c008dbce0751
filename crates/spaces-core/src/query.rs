//! Listing query: category, location, and price filters applied in sequence.

use serde::Serialize;

use crate::{CategoryCatalog, CoreError, LocationRecord, LocationSelection, PriceFilter, ALL_SPACES};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// `None` behaves like [`ALL_SPACES`].
    pub category: Option<String>,
    pub location: LocationSelection,
    pub price: PriceFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub items: Vec<LocationRecord>,
    pub total: usize,
}

/// Filter `records` by category tag, then location, then price.
///
/// The location stage is an OR across levels: a record passes when its
/// country, state, or city is selected. It trusts the selection sets as given
/// and does not derive ancestry. Records without a complete place never pass
/// an active location filter.
///
/// # Errors
///
/// Returns [`CoreError::UnknownCategory`] if the category is not in `catalog`.
pub fn query_listings(
    records: &[LocationRecord],
    catalog: &CategoryCatalog,
    query: &ListingQuery,
) -> Result<QueryResult, CoreError> {
    let category = query.category.as_deref().unwrap_or(ALL_SPACES);
    let config = catalog
        .get(category)
        .ok_or_else(|| CoreError::UnknownCategory(category.to_string()))?;

    let items: Vec<LocationRecord> = records
        .iter()
        .filter(|r| config.is_all_spaces() || config.includes_tag(&r.source_file))
        .filter(|r| matches_location(r, &query.location))
        .filter(|r| query.price.matches(r.price.amount))
        .cloned()
        .collect();

    let total = items.len();
    Ok(QueryResult { items, total })
}

fn matches_location(record: &LocationRecord, selection: &LocationSelection) -> bool {
    if selection.is_empty() {
        return true;
    }
    record.place().is_some_and(|place| {
        selection.countries.contains(place.country)
            || selection.states.contains(place.state)
            || selection.cities.contains(place.city)
    })
}
