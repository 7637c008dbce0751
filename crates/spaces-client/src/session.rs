//! Client-side state of one category page.
//!
//! A [`BrowseSession`] owns the selected category, the location and price
//! filters, and the load state of the two independent fetches. Fetches are
//! split into `start_*` (returns a `'static` future tagged with a
//! [`RequestTicket`]) and `apply_*` (stores the result only when the ticket is
//! still the latest), so racing responses can never overwrite newer ones.
//! Filter mutations return whether anything changed; a change schedules a
//! debounced URL write and leaves it to the caller to refresh listings.

use std::future::Future;
use std::sync::Arc;

use spaces_core::{
    CountryNode, FilterChange, FilterParams, LocationFilter, PriceFilter, PriceRange, ALL_SPACES,
};

use crate::client::{SpacesClient, SpacesPage, SpacesRequest};
use crate::error::ClientError;
use crate::guard::{RequestGuard, RequestTicket};
use crate::url_sync::UrlSync;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    /// Terminal until the user retries.
    Failed(String),
}

impl<T> LoadState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Outcome of a fetch started by the session, tagged with its ticket.
#[derive(Debug)]
pub struct Fetched<T> {
    ticket: RequestTicket,
    result: Result<T, ClientError>,
}

impl<T> Fetched<T> {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.ticket.generation()
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        self.ticket.is_current()
    }
}

#[derive(Debug)]
pub struct BrowseSession {
    client: SpacesClient,
    category: String,
    location: LocationFilter,
    price: PriceFilter,
    hierarchy: LoadState<Arc<[CountryNode]>>,
    listings: LoadState<SpacesPage>,
    hierarchy_guard: RequestGuard,
    listings_guard: RequestGuard,
    url_sync: Option<UrlSync>,
    /// Current page query; non-filter parameters in it survive URL writes.
    base_query: String,
}

impl BrowseSession {
    /// A blank category means [`ALL_SPACES`].
    #[must_use]
    pub fn new(client: SpacesClient, category: impl Into<String>) -> Self {
        let category = category.into();
        let category = if category.trim().is_empty() {
            ALL_SPACES.to_string()
        } else {
            category
        };
        Self {
            client,
            category,
            location: LocationFilter::default(),
            price: PriceFilter::default(),
            hierarchy: LoadState::Loading,
            listings: LoadState::Loading,
            hierarchy_guard: RequestGuard::new(),
            listings_guard: RequestGuard::new(),
            url_sync: None,
            base_query: String::new(),
        }
    }

    #[must_use]
    pub fn with_url_sync(mut self, url_sync: UrlSync) -> Self {
        self.url_sync = Some(url_sync);
        self
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns `true` when the category changed and listings need a refresh.
    pub fn set_category(&mut self, category: impl Into<String>) -> bool {
        let category = category.into();
        if category == self.category {
            return false;
        }
        self.category = category;
        true
    }

    #[must_use]
    pub fn location_filter(&self) -> &LocationFilter {
        &self.location
    }

    #[must_use]
    pub fn price_filter(&self) -> &PriceFilter {
        &self.price
    }

    #[must_use]
    pub fn hierarchy_state(&self) -> &LoadState<Arc<[CountryNode]>> {
        &self.hierarchy
    }

    #[must_use]
    pub fn listings_state(&self) -> &LoadState<SpacesPage> {
        &self.listings
    }

    #[must_use]
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            location: self.location.selection().clone(),
            price_ranges: self.price.ranges.clone(),
        }
    }

    #[must_use]
    pub fn request(&self) -> SpacesRequest {
        SpacesRequest::new(self.category.clone(), self.filter_params())
    }

    // -----------------------------------------------------------------------
    // Fetching
    // -----------------------------------------------------------------------

    /// Mark the hierarchy as loading and return the fetch to run.
    pub fn start_hierarchy_fetch(
        &mut self,
    ) -> impl Future<Output = Fetched<Vec<CountryNode>>> + Send + 'static {
        self.hierarchy = LoadState::Loading;
        let ticket = self.hierarchy_guard.begin();
        let client = self.client.clone();
        async move {
            let result = client.fetch_hierarchy().await;
            Fetched { ticket, result }
        }
    }

    /// Store a hierarchy result. Returns `false` if a newer fetch superseded it.
    pub fn apply_hierarchy(&mut self, fetched: Fetched<Vec<CountryNode>>) -> bool {
        if !fetched.is_current() {
            tracing::debug!(
                generation = fetched.generation(),
                "discarding stale hierarchy response"
            );
            return false;
        }
        match fetched.result {
            Ok(nodes) => {
                let hierarchy: Arc<[CountryNode]> = Arc::from(nodes);
                self.location.replace_hierarchy(Arc::clone(&hierarchy));
                self.hierarchy = LoadState::Ready(hierarchy);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load location hierarchy");
                self.hierarchy = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    pub async fn load_hierarchy(&mut self) {
        let fetched = self.start_hierarchy_fetch().await;
        self.apply_hierarchy(fetched);
    }

    /// Mark listings as loading and return the fetch for the current filters.
    pub fn start_listing_fetch(
        &mut self,
    ) -> impl Future<Output = Fetched<SpacesPage>> + Send + 'static {
        self.listings = LoadState::Loading;
        let ticket = self.listings_guard.begin();
        let client = self.client.clone();
        let request = self.request();
        async move {
            let result = client.fetch_spaces(&request).await;
            Fetched { ticket, result }
        }
    }

    /// Store a listing result. Returns `false` if a newer fetch superseded it.
    pub fn apply_listings(&mut self, fetched: Fetched<SpacesPage>) -> bool {
        if !fetched.is_current() {
            tracing::debug!(
                generation = fetched.generation(),
                "discarding stale listings response"
            );
            return false;
        }
        self.listings = match fetched.result {
            Ok(page) => LoadState::Ready(page),
            Err(e) => {
                tracing::warn!(error = %e, category = %self.category, "failed to load spaces");
                LoadState::Failed(e.to_string())
            }
        };
        true
    }

    pub async fn refresh_listings(&mut self) {
        let fetched = self.start_listing_fetch().await;
        self.apply_listings(fetched);
    }

    /// Re-run both fetches, as the "try again" action does.
    pub async fn retry(&mut self) {
        let hierarchy = self.start_hierarchy_fetch();
        let listings = self.start_listing_fetch();
        let (hierarchy, listings) = tokio::join!(hierarchy, listings);
        self.apply_hierarchy(hierarchy);
        self.apply_listings(listings);
    }

    // -----------------------------------------------------------------------
    // Filter operations
    // -----------------------------------------------------------------------

    pub fn set_country(&mut self, country: &str, checked: bool) -> FilterChange {
        let change = self.location.set_country(country, checked);
        self.after_change(change)
    }

    pub fn set_state(&mut self, country: &str, state: &str, checked: bool) -> FilterChange {
        let change = self.location.set_state(country, state, checked);
        self.after_change(change)
    }

    pub fn set_city(&mut self, city: &str, checked: bool) -> FilterChange {
        let change = self.location.set_city(city, checked);
        self.after_change(change)
    }

    pub fn set_price_range(&mut self, range: PriceRange, checked: bool) -> FilterChange {
        let change = if self.price.set_range(range, checked) {
            FilterChange::Changed
        } else {
            FilterChange::Unchanged
        };
        self.after_change(change)
    }

    /// Clear the location selection only.
    pub fn clear_locations(&mut self) -> FilterChange {
        let change = self.location.clear_all();
        self.after_change(change)
    }

    /// Clear the price selection only.
    pub fn clear_prices(&mut self) -> FilterChange {
        let change = if self.price.clear_all() {
            FilterChange::Changed
        } else {
            FilterChange::Unchanged
        };
        self.after_change(change)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.location.set_search_query(query);
    }

    pub fn clear_search(&mut self) {
        self.location.clear_search();
    }

    pub fn toggle_country_expansion(&mut self, country: &str) {
        self.location.toggle_country_expansion(country);
    }

    pub fn toggle_state_expansion(&mut self, country: &str, state: &str) {
        self.location.toggle_state_expansion(country, state);
    }

    /// Seed the filters from a page query string, e.g. on load or history
    /// navigation. Any pending URL write is dropped since the URL is now the
    /// source of truth.
    pub fn restore_from_query(&mut self, query: &str) -> FilterChange {
        let params = FilterParams::from_query(query);
        self.base_query = query.strip_prefix('?').unwrap_or(query).to_string();
        if let Some(sync) = self.url_sync.as_mut() {
            sync.cancel();
        }

        let price = PriceFilter::new(params.price_ranges);
        let price_changed = price != self.price;
        self.price = price;
        let location_changed = self.location.replace_selection(params.location).is_changed();

        if price_changed || location_changed {
            FilterChange::Changed
        } else {
            FilterChange::Unchanged
        }
    }

    /// Write any pending URL update immediately.
    pub fn flush_url(&mut self) {
        if let Some(sync) = self.url_sync.as_mut() {
            sync.flush_now();
        }
    }

    fn after_change(&mut self, change: FilterChange) -> FilterChange {
        if change.is_changed() {
            let query = self.filter_params().merge_into(&self.base_query);
            self.base_query.clone_from(&query);
            if let Some(sync) = self.url_sync.as_mut() {
                sync.schedule(query);
            }
        }
        change
    }
}
