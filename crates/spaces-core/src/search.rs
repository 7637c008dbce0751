//! Text search over the location hierarchy.

use std::collections::BTreeSet;

use crate::hierarchy::{CountryNode, StateNode};

fn matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}

/// Narrow `hierarchy` to the branches matching `query` (case-insensitive
/// substring). A blank query returns the hierarchy unchanged.
///
/// A matching country keeps all of its states and a matching state keeps all
/// of its cities; otherwise only matching descendants survive.
#[must_use]
pub fn filter_hierarchy(hierarchy: &[CountryNode], query: &str) -> Vec<CountryNode> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return hierarchy.to_vec();
    }

    hierarchy
        .iter()
        .filter_map(|country| {
            if matches(&country.country, &needle) {
                return Some(country.clone());
            }
            let states: Vec<StateNode> = country
                .states
                .iter()
                .filter_map(|state| filter_state(state, &needle))
                .collect();
            (!states.is_empty()).then(|| CountryNode {
                country: country.country.clone(),
                states,
            })
        })
        .collect()
}

fn filter_state(state: &StateNode, needle: &str) -> Option<StateNode> {
    if matches(&state.state, needle) {
        return Some(state.clone());
    }
    let cities: Vec<String> = state
        .cities
        .iter()
        .filter(|c| matches(c, needle))
        .cloned()
        .collect();
    (!cities.is_empty()).then(|| StateNode {
        state: state.state.clone(),
        cities,
    })
}

/// Expansion keys for every country and every (country, state) retained in
/// an already-filtered hierarchy.
#[must_use]
pub fn expansion_for(filtered: &[CountryNode]) -> (BTreeSet<String>, BTreeSet<(String, String)>) {
    let countries = filtered.iter().map(|c| c.country.clone()).collect();
    let states = filtered
        .iter()
        .flat_map(|c| {
            c.states
                .iter()
                .map(move |s| (c.country.clone(), s.state.clone()))
        })
        .collect();
    (countries, states)
}
