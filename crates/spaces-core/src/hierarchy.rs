//! Country → state → city tree derived from the flat record list.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::LocationRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub state: String,
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryNode {
    pub country: String,
    pub states: Vec<StateNode>,
}

impl CountryNode {
    #[must_use]
    pub fn state(&self, state: &str) -> Option<&StateNode> {
        self.states.iter().find(|s| s.state == state)
    }
}

impl StateNode {
    #[must_use]
    pub fn has_city(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }
}

/// Orders place names the way a reader expects: accents and case are folded
/// first, and the raw string breaks ties so the order stays total.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(name: &str) -> String {
    deunicode::deunicode(name).to_lowercase()
}

/// Build the sorted, de-duplicated location tree from `records`.
///
/// Records without a complete place are skipped.
#[must_use]
pub fn build_hierarchy(records: &[LocationRecord]) -> Vec<CountryNode> {
    let mut tree: BTreeMap<&str, BTreeMap<&str, BTreeSet<&str>>> = BTreeMap::new();

    for place in records.iter().filter_map(LocationRecord::place) {
        tree.entry(place.country)
            .or_default()
            .entry(place.state)
            .or_default()
            .insert(place.city);
    }

    let mut countries: Vec<CountryNode> = tree
        .into_iter()
        .map(|(country, states)| {
            let mut states: Vec<StateNode> = states
                .into_iter()
                .map(|(state, cities)| {
                    let mut cities: Vec<String> = cities.into_iter().map(str::to_owned).collect();
                    cities.sort_by(|a, b| collate(a, b));
                    StateNode {
                        state: state.to_owned(),
                        cities,
                    }
                })
                .collect();
            states.sort_by(|a, b| collate(&a.state, &b.state));
            CountryNode {
                country: country.to_owned(),
                states,
            }
        })
        .collect();
    countries.sort_by(|a, b| collate(&a.country, &b.country));
    countries
}

#[must_use]
pub fn countries(hierarchy: &[CountryNode]) -> Vec<&str> {
    hierarchy.iter().map(|c| c.country.as_str()).collect()
}

#[must_use]
pub fn find_country<'a>(hierarchy: &'a [CountryNode], country: &str) -> Option<&'a CountryNode> {
    hierarchy.iter().find(|c| c.country == country)
}

#[must_use]
pub fn find_state<'a>(
    hierarchy: &'a [CountryNode],
    country: &str,
    state: &str,
) -> Option<&'a StateNode> {
    find_country(hierarchy, country).and_then(|c| c.state(state))
}

#[must_use]
pub fn states_of<'a>(hierarchy: &'a [CountryNode], country: &str) -> Vec<&'a str> {
    find_country(hierarchy, country)
        .map(|c| c.states.iter().map(|s| s.state.as_str()).collect())
        .unwrap_or_default()
}

#[must_use]
pub fn cities_of<'a>(hierarchy: &'a [CountryNode], country: &str, state: &str) -> &'a [String] {
    find_state(hierarchy, country, state).map_or(&[], |s| s.cities.as_slice())
}

#[must_use]
pub fn all_cities(hierarchy: &[CountryNode]) -> Vec<&str> {
    hierarchy
        .iter()
        .flat_map(|c| c.states.iter())
        .flat_map(|s| s.cities.iter().map(String::as_str))
        .collect()
}

/// Find the country and state that own `city`. The first match in tree order
/// wins if a city name appears under more than one state.
#[must_use]
pub fn owner_of_city<'a>(
    hierarchy: &'a [CountryNode],
    city: &str,
) -> Option<(&'a CountryNode, &'a StateNode)> {
    hierarchy.iter().find_map(|country| {
        country
            .states
            .iter()
            .find(|s| s.has_city(city))
            .map(|state| (country, state))
    })
}
