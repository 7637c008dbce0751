//! Tri-state location filter over the country → state → city tree.
//!
//! Checking an item is additive: it selects the item's whole subtree and
//! promotes an ancestor only once every sibling under it is selected.
//! Unchecking is subtractive: it clears the subtree and every ancestor of the
//! item, even when siblings remain selected. Re-checking a single leaf after
//! that does not restore an ancestor unless the leaf completes its subtree.
//!
//! The filter is a plain value. Each mutation returns a [`FilterChange`] so
//! the owner decides when to re-render or schedule URL synchronisation.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hierarchy::{find_country, find_state, owner_of_city, CountryNode, StateNode};
use crate::search::{expansion_for, filter_hierarchy};

/// The selected countries, states and cities.
///
/// The three sets are not required to agree with the tree (a state may be
/// selected while only some of its cities are); the propagation rules are
/// maintained by [`LocationFilter`] mutations only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSelection {
    pub countries: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub cities: BTreeSet<String>,
}

impl LocationSelection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.states.is_empty() && self.cities.is_empty()
    }

    pub fn clear(&mut self) {
        self.countries.clear();
        self.states.clear();
        self.cities.clear();
    }

    fn select_state(&mut self, node: &StateNode) {
        self.states.insert(node.state.clone());
        self.cities.extend(node.cities.iter().cloned());
    }

    fn deselect_state(&mut self, node: &StateNode) {
        self.states.remove(&node.state);
        for city in &node.cities {
            self.cities.remove(city);
        }
    }

    fn all_states_selected(&self, country: &CountryNode) -> bool {
        country.states.iter().all(|s| self.states.contains(&s.state))
    }

    fn all_cities_selected(&self, state: &StateNode) -> bool {
        state.cities.iter().all(|c| self.cities.contains(c))
    }
}

/// Whether a mutation altered the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    Changed,
    Unchanged,
}

impl FilterChange {
    #[must_use]
    pub fn is_changed(self) -> bool {
        self == FilterChange::Changed
    }

    fn between(before: &LocationSelection, after: &LocationSelection) -> Self {
        if before == after {
            FilterChange::Unchanged
        } else {
            FilterChange::Changed
        }
    }
}

/// Rendered state of a tri-state checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Checked,
    Unchecked,
    Indeterminate,
}

#[derive(Debug, Clone)]
pub struct LocationFilter {
    hierarchy: Arc<[CountryNode]>,
    selection: LocationSelection,
    expanded_countries: BTreeSet<String>,
    expanded_states: BTreeSet<(String, String)>,
    search_query: String,
}

impl Default for LocationFilter {
    fn default() -> Self {
        Self::new(Arc::from(Vec::new()))
    }
}

impl LocationFilter {
    #[must_use]
    pub fn new(hierarchy: Arc<[CountryNode]>) -> Self {
        Self::with_selection(hierarchy, LocationSelection::default())
    }

    /// Create a filter seeded with an existing selection, typically one
    /// restored from URL parameters.
    #[must_use]
    pub fn with_selection(hierarchy: Arc<[CountryNode]>, selection: LocationSelection) -> Self {
        Self {
            hierarchy,
            selection,
            expanded_countries: BTreeSet::new(),
            expanded_states: BTreeSet::new(),
            search_query: String::new(),
        }
    }

    #[must_use]
    pub fn hierarchy(&self) -> &[CountryNode] {
        &self.hierarchy
    }

    #[must_use]
    pub fn selection(&self) -> &LocationSelection {
        &self.selection
    }

    /// Swap in a freshly loaded hierarchy. The selection is kept as-is and the
    /// search expansion is recomputed against the new tree.
    pub fn replace_hierarchy(&mut self, hierarchy: Arc<[CountryNode]>) {
        self.hierarchy = hierarchy;
        self.refresh_search_expansion();
    }

    pub fn replace_selection(&mut self, selection: LocationSelection) -> FilterChange {
        let change = FilterChange::between(&self.selection, &selection);
        self.selection = selection;
        change
    }

    pub fn set_country(&mut self, country: &str, checked: bool) -> FilterChange {
        let before = self.selection.clone();
        let node = find_country(&self.hierarchy, country);

        if checked {
            self.selection.countries.insert(country.to_owned());
            for state in node.iter().flat_map(|c| c.states.iter()) {
                self.selection.select_state(state);
            }
        } else {
            self.selection.countries.remove(country);
            for state in node.iter().flat_map(|c| c.states.iter()) {
                self.selection.deselect_state(state);
            }
        }

        FilterChange::between(&before, &self.selection)
    }

    pub fn set_state(&mut self, country: &str, state: &str, checked: bool) -> FilterChange {
        let before = self.selection.clone();
        let country_node = find_country(&self.hierarchy, country);
        let state_node = country_node.and_then(|c| c.state(state));

        if checked {
            self.selection.states.insert(state.to_owned());
            if let Some(node) = state_node {
                self.selection.select_state(node);
            }
            if let Some(node) = country_node {
                if self.selection.all_states_selected(node) {
                    self.selection.countries.insert(country.to_owned());
                } else {
                    self.selection.countries.remove(country);
                }
            }
        } else {
            self.selection.states.remove(state);
            if let Some(node) = state_node {
                self.selection.deselect_state(node);
            }
            self.selection.countries.remove(country);
        }

        FilterChange::between(&before, &self.selection)
    }

    pub fn set_city(&mut self, city: &str, checked: bool) -> FilterChange {
        let before = self.selection.clone();
        let owner = owner_of_city(&self.hierarchy, city);

        if checked {
            self.selection.cities.insert(city.to_owned());
            if let Some((country, state)) = owner {
                if self.selection.all_cities_selected(state) {
                    self.selection.states.insert(state.state.clone());
                    if self.selection.all_states_selected(country) {
                        self.selection.countries.insert(country.country.clone());
                    }
                }
            }
        } else {
            self.selection.cities.remove(city);
            if let Some((country, state)) = owner {
                self.selection.states.remove(&state.state);
                self.selection.countries.remove(&country.country);
            }
        }

        FilterChange::between(&before, &self.selection)
    }

    /// `true` when the country is not fully selected but something beneath it is.
    #[must_use]
    pub fn is_country_indeterminate(&self, country: &str) -> bool {
        if self.selection.countries.contains(country) {
            return false;
        }
        let Some(node) = find_country(&self.hierarchy, country) else {
            return false;
        };
        if node.states.iter().all(|s| self.is_state_complete(s)) {
            return false;
        }

        node.states.iter().any(|s| {
            self.selection.states.contains(&s.state)
                || s.cities.iter().any(|c| self.selection.cities.contains(c))
        })
    }

    /// `true` only when some, but not all, of the state's cities are selected.
    #[must_use]
    pub fn is_state_indeterminate(&self, country: &str, state: &str) -> bool {
        let Some(node) = find_state(&self.hierarchy, country, state) else {
            return false;
        };
        if self.is_state_complete(node) {
            return false;
        }
        node.cities.iter().any(|c| self.selection.cities.contains(c))
    }

    fn is_state_complete(&self, node: &StateNode) -> bool {
        self.selection.states.contains(&node.state)
            || (!node.cities.is_empty() && self.selection.all_cities_selected(node))
    }

    fn is_country_complete(&self, country: &str) -> bool {
        if self.selection.countries.contains(country) {
            return true;
        }
        find_country(&self.hierarchy, country).is_some_and(|node| {
            !node.states.is_empty() && node.states.iter().all(|s| self.is_state_complete(s))
        })
    }

    /// A node renders as checked when it is selected itself or when every
    /// node beneath it is, e.g. a selection restored from `?cities=...`.
    #[must_use]
    pub fn country_check_state(&self, country: &str) -> CheckState {
        if self.is_country_complete(country) {
            CheckState::Checked
        } else if self.is_country_indeterminate(country) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    #[must_use]
    pub fn state_check_state(&self, country: &str, state: &str) -> CheckState {
        let complete = match find_state(&self.hierarchy, country, state) {
            Some(node) => self.is_state_complete(node),
            None => self.selection.states.contains(state),
        };
        if complete {
            CheckState::Checked
        } else if self.is_state_indeterminate(country, state) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    #[must_use]
    pub fn city_check_state(&self, city: &str) -> CheckState {
        if self.selection.cities.contains(city) {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }

    /// Empty every selection set. Expansion and search are left alone.
    pub fn clear_all(&mut self) -> FilterChange {
        let before = self.selection.clone();
        self.selection.clear();
        FilterChange::between(&before, &self.selection)
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.selection.is_empty()
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Set the search text. A non-blank query replaces the expansion state
    /// with every country and state that survives the search.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.refresh_search_expansion();
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    /// The hierarchy as narrowed by the current search query.
    #[must_use]
    pub fn filtered_hierarchy(&self) -> Vec<CountryNode> {
        filter_hierarchy(&self.hierarchy, &self.search_query)
    }

    fn refresh_search_expansion(&mut self) {
        if self.search_query.trim().is_empty() {
            return;
        }
        let (countries, states) = expansion_for(&self.filtered_hierarchy());
        self.expanded_countries = countries;
        self.expanded_states = states;
    }

    pub fn toggle_country_expansion(&mut self, country: &str) {
        if !self.expanded_countries.remove(country) {
            self.expanded_countries.insert(country.to_owned());
        }
    }

    pub fn toggle_state_expansion(&mut self, country: &str, state: &str) {
        let key = (country.to_owned(), state.to_owned());
        if !self.expanded_states.remove(&key) {
            self.expanded_states.insert(key);
        }
    }

    #[must_use]
    pub fn is_country_expanded(&self, country: &str) -> bool {
        self.expanded_countries.contains(country)
    }

    #[must_use]
    pub fn is_state_expanded(&self, country: &str, state: &str) -> bool {
        self.expanded_states
            .contains(&(country.to_owned(), state.to_owned()))
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
