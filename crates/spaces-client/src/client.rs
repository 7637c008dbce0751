//! HTTP client for the spaces API.
//!
//! Every endpoint answers with a `{success, data, total?, error?}` envelope.
//! Non-2xx statuses surface as [`ClientError::Status`] and `success: false`
//! as [`ClientError::Api`]; there are no retries.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use spaces_core::url_params::{CITIES_KEY, COUNTRIES_KEY, PRICE_RANGES_KEY, STATES_KEY};
use spaces_core::{AppConfig, CountryNode, FilterParams, LocationRecord, ALL_SPACES};

use crate::error::ClientError;

/// Parameters of one listing fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacesRequest {
    pub category: String,
    pub filters: FilterParams,
}

impl SpacesRequest {
    #[must_use]
    pub fn new(category: impl Into<String>, filters: FilterParams) -> Self {
        Self {
            category: category.into(),
            filters,
        }
    }

    #[must_use]
    pub fn all_spaces() -> Self {
        Self::new(ALL_SPACES, FilterParams::default())
    }

    /// Query pairs in wire order; empty lists are omitted.
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let join = |items: &std::collections::BTreeSet<String>| {
            items.iter().map(String::as_str).collect::<Vec<_>>().join(",")
        };
        let location = &self.filters.location;
        let prices = self
            .filters
            .price_ranges
            .iter()
            .map(|r| r.id())
            .collect::<Vec<_>>()
            .join(",");

        let mut pairs = vec![("category", self.category.clone())];
        pairs.extend(
            [
                (COUNTRIES_KEY, join(&location.countries)),
                (STATES_KEY, join(&location.states)),
                (CITIES_KEY, join(&location.cities)),
                (PRICE_RANGES_KEY, prices),
            ]
            .into_iter()
            .filter(|(_, value)| !value.is_empty()),
        );
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpacesPage {
    pub items: Vec<LocationRecord>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    total: Option<usize>,
    error: Option<String>,
}

/// Client for the spaces API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SpacesClient {
    client: Client,
    base_url: Url,
}

impl SpacesClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("spaces-client/0.1")
            .build()?;

        // One trailing slash so `join` appends to the base path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// # Errors
    ///
    /// See [`SpacesClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_base_url, config.client_timeout_secs)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the listings matching `request`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Status`] on a non-2xx response.
    /// - [`ClientError::Api`] if the envelope reports failure.
    /// - [`ClientError::Http`] on network failure or timeout.
    /// - [`ClientError::Deserialize`] if the body is not a listing envelope.
    pub async fn fetch_spaces(&self, request: &SpacesRequest) -> Result<SpacesPage, ClientError> {
        let mut url = self.endpoint("api/spaces")?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in request.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }

        let envelope: Envelope<Vec<LocationRecord>> = self.get_envelope(&url).await?;
        let items = envelope
            .data
            .ok_or_else(|| ClientError::Api("response is missing data".to_string()))?;
        let total = envelope.total.unwrap_or(items.len());
        tracing::debug!(category = %request.category, total, "fetched spaces");
        Ok(SpacesPage { items, total })
    }

    /// Fetch the country → state → city tree.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`SpacesClient::fetch_spaces`].
    pub async fn fetch_hierarchy(&self) -> Result<Vec<CountryNode>, ClientError> {
        let url = self.endpoint("api/location-hierarchy")?;
        let envelope: Envelope<Vec<CountryNode>> = self.get_envelope(&url).await?;
        let hierarchy = envelope
            .data
            .ok_or_else(|| ClientError::Api("response is missing data".to_string()))?;
        tracing::debug!(countries = hierarchy.len(), "fetched location hierarchy");
        Ok(hierarchy)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn get_envelope<T: DeserializeOwned>(&self, url: &Url) -> Result<Envelope<T>, ClientError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "spaces API returned an error status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        if !envelope.success {
            return Err(ClientError::Api(
                envelope
                    .error
                    .unwrap_or_else(|| "API returned error".to_string()),
            ));
        }
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use spaces_core::PriceRange;

    use super::*;

    #[test]
    fn new_normalises_trailing_slash() {
        let client = SpacesClient::new("http://localhost:3000///", 5).expect("client");
        assert_eq!(client.base_url().as_str(), "http://localhost:3000/");
        let url = client.endpoint("api/spaces").expect("endpoint");
        assert_eq!(url.as_str(), "http://localhost:3000/api/spaces");
    }

    #[test]
    fn new_keeps_path_prefix() {
        let client = SpacesClient::new("http://localhost:3000/v2", 5).expect("client");
        let url = client.endpoint("api/location-hierarchy").expect("endpoint");
        assert_eq!(url.as_str(), "http://localhost:3000/v2/api/location-hierarchy");
    }

    #[test]
    fn new_rejects_garbage_url() {
        let err = SpacesClient::new("not a url", 5).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn query_pairs_skip_empty_lists() {
        let mut filters = FilterParams::default();
        filters.location.states.insert("Goa".to_string());
        filters.location.states.insert("Kerala".to_string());
        filters.price_ranges.insert(PriceRange::Above12000);

        let request = SpacesRequest::new("events", filters);
        assert_eq!(
            request.query_pairs(),
            vec![
                ("category", "events".to_string()),
                ("states", "Goa,Kerala".to_string()),
                ("priceRanges", "above-12000".to_string()),
            ]
        );
        assert_eq!(
            SpacesRequest::all_spaces().query_pairs(),
            vec![("category", "all-spaces".to_string())]
        );
    }
}
