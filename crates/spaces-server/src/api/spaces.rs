use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use spaces_core::{
    url_params::{parse_list, parse_price_ranges},
    ListingQuery, LocationRecord, LocationSelection, PriceFilter,
};

use crate::middleware::RequestId;

use super::{map_core_error, ApiError, ApiResponse, AppState};

/// Query string of `GET /api/spaces`. List values are comma-separated.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SpacesParams {
    pub category: Option<String>,
    pub countries: Option<String>,
    pub states: Option<String>,
    pub cities: Option<String>,
    #[serde(rename = "priceRanges")]
    pub price_ranges: Option<String>,
}

impl SpacesParams {
    fn into_query(self) -> Result<ListingQuery, spaces_core::CoreError> {
        let ranges = parse_price_ranges(self.price_ranges.as_deref())?;
        Ok(ListingQuery {
            category: self.category.filter(|c| !c.trim().is_empty()),
            location: LocationSelection {
                countries: parse_list(self.countries.as_deref()),
                states: parse_list(self.states.as_deref()),
                cities: parse_list(self.cities.as_deref()),
            },
            price: PriceFilter::new(ranges),
        })
    }
}

pub(super) async fn list_spaces(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SpacesParams>,
) -> Result<Json<ApiResponse<Vec<LocationRecord>>>, ApiError> {
    let query = params
        .into_query()
        .map_err(|e| map_core_error(req_id.0.clone(), &e))?;

    let result = state
        .store
        .query(&state.catalog, &query)
        .map_err(|e| map_core_error(req_id.0.clone(), &e))?;

    tracing::debug!(
        category = query.category.as_deref().unwrap_or(spaces_core::ALL_SPACES),
        total = result.total,
        "listing query"
    );

    Ok(Json(
        ApiResponse::ok(result.items, req_id.0).with_total(result.total),
    ))
}
