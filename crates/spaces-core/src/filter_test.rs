use std::sync::Arc;

use super::*;

fn node(country: &str, states: Vec<(&str, Vec<&str>)>) -> CountryNode {
    CountryNode {
        country: country.to_string(),
        states: states
            .into_iter()
            .map(|(state, cities)| StateNode {
                state: state.to_string(),
                cities: cities.into_iter().map(str::to_string).collect(),
            })
            .collect(),
    }
}

fn hierarchy() -> Arc<[CountryNode]> {
    Arc::from(vec![
        node(
            "India",
            vec![
                ("Karnataka", vec!["Bengaluru", "Mysuru"]),
                ("Maharashtra", vec!["Mumbai", "Pune"]),
            ],
        ),
        node(
            "United States",
            vec![
                ("California", vec!["Los Angeles", "San Diego"]),
                ("New York", vec!["Brooklyn"]),
            ],
        ),
    ])
}

fn filter() -> LocationFilter {
    LocationFilter::new(hierarchy())
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

#[test]
fn checking_country_selects_whole_subtree() {
    let mut f = filter();
    assert!(f.set_country("India", true).is_changed());

    let sel = f.selection();
    assert_eq!(sel.countries, set(&["India"]));
    assert_eq!(sel.states, set(&["Karnataka", "Maharashtra"]));
    assert_eq!(sel.cities, set(&["Bengaluru", "Mumbai", "Mysuru", "Pune"]));
}

#[test]
fn unchecking_country_clears_subtree_even_after_partial_edits() {
    let mut f = filter();
    let _ = f.set_city("Pune", true);
    let _ = f.set_state("India", "Karnataka", true);
    let _ = f.set_country("United States", true);

    let _ = f.set_country("India", false);

    let sel = f.selection();
    assert!(!sel.countries.contains("India"));
    assert!(sel.states.is_disjoint(&set(&["Karnataka", "Maharashtra"])));
    assert!(sel.cities.is_disjoint(&set(&["Bengaluru", "Mumbai", "Mysuru", "Pune"])));
    assert_eq!(sel.countries, set(&["United States"]), "other countries untouched");
}

#[test]
fn checking_unknown_country_only_adds_the_name() {
    let mut f = filter();
    let _ = f.set_country("Atlantis", true);
    assert_eq!(f.selection().countries, set(&["Atlantis"]));
    assert!(f.selection().states.is_empty());
}

#[test]
fn repeated_check_reports_unchanged() {
    let mut f = filter();
    assert_eq!(f.set_country("India", true), FilterChange::Changed);
    assert_eq!(f.set_country("India", true), FilterChange::Unchanged);
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[test]
fn checking_state_selects_its_cities_without_completing_country() {
    let mut f = filter();
    let _ = f.set_state("India", "Karnataka", true);

    let sel = f.selection();
    assert_eq!(sel.states, set(&["Karnataka"]));
    assert_eq!(sel.cities, set(&["Bengaluru", "Mysuru"]));
    assert!(sel.countries.is_empty());
}

#[test]
fn checking_last_state_completes_country() {
    let mut f = filter();
    let _ = f.set_state("India", "Karnataka", true);
    let _ = f.set_state("India", "Maharashtra", true);
    assert_eq!(f.selection().countries, set(&["India"]));
}

#[test]
fn checking_incomplete_state_drops_stale_country_selection() {
    let selection = LocationSelection {
        countries: set(&["India"]),
        ..LocationSelection::default()
    };
    let mut f = LocationFilter::with_selection(hierarchy(), selection);

    let _ = f.set_state("India", "Karnataka", true);
    assert!(f.selection().countries.is_empty());
}

#[test]
fn unchecking_state_clears_country_even_with_siblings_selected() {
    let mut f = filter();
    let _ = f.set_country("India", true);
    let _ = f.set_state("India", "Karnataka", false);

    let sel = f.selection();
    assert!(sel.countries.is_empty());
    assert_eq!(sel.states, set(&["Maharashtra"]));
    assert_eq!(sel.cities, set(&["Mumbai", "Pune"]));
}

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

#[test]
fn checking_every_city_promotes_state_then_country() {
    let mut f = filter();
    let _ = f.set_state("United States", "New York", true);

    let _ = f.set_city("Los Angeles", true);
    assert!(!f.selection().states.contains("California"));

    let _ = f.set_city("San Diego", true);
    assert!(f.selection().states.contains("California"));
    assert!(f.selection().countries.contains("United States"));
}

#[test]
fn completing_state_does_not_complete_country_with_open_siblings() {
    let mut f = filter();
    let _ = f.set_city("Los Angeles", true);
    let _ = f.set_city("San Diego", true);

    assert!(f.selection().states.contains("California"));
    assert!(f.selection().countries.is_empty());
}

#[test]
fn unchecking_any_city_clears_owner_state_and_country() {
    let mut f = filter();
    let _ = f.set_country("India", true);
    let _ = f.set_city("Mysuru", false);

    let sel = f.selection();
    assert!(!sel.countries.contains("India"));
    assert!(!sel.states.contains("Karnataka"));
    assert!(sel.states.contains("Maharashtra"));
    assert!(sel.cities.contains("Bengaluru"));
}

#[test]
fn rechecking_single_leaf_restores_ancestors_only_when_complete() {
    let mut f = filter();
    let _ = f.set_country("India", true);
    let _ = f.set_city("Pune", false);
    let _ = f.set_city("Mumbai", false);

    let _ = f.set_city("Pune", true);
    assert!(!f.selection().states.contains("Maharashtra"));
    assert!(!f.selection().countries.contains("India"));

    let _ = f.set_city("Mumbai", true);
    assert!(f.selection().states.contains("Maharashtra"));
    assert!(f.selection().countries.contains("India"));
}

#[test]
fn unknown_city_is_added_without_propagation() {
    let mut f = filter();
    let _ = f.set_city("Gotham", true);
    assert_eq!(f.selection().cities, set(&["Gotham"]));
    assert!(f.selection().states.is_empty());
}

// ---------------------------------------------------------------------------
// Indeterminate
// ---------------------------------------------------------------------------

#[test]
fn state_indeterminate_only_for_partial_city_selection() {
    let mut f = filter();
    assert!(!f.is_state_indeterminate("India", "Maharashtra"));

    let _ = f.set_city("Mumbai", true);
    assert!(f.is_state_indeterminate("India", "Maharashtra"));

    let _ = f.set_city("Pune", true);
    assert!(!f.is_state_indeterminate("India", "Maharashtra"));
}

#[test]
fn state_with_all_cities_restored_from_url_is_not_indeterminate() {
    let selection = LocationSelection {
        cities: set(&["Mumbai", "Pune"]),
        ..LocationSelection::default()
    };
    let f = LocationFilter::with_selection(hierarchy(), selection);
    assert!(!f.is_state_indeterminate("India", "Maharashtra"));
}

#[test]
fn country_indeterminate_tracks_any_descendant() {
    let mut f = filter();
    assert!(!f.is_country_indeterminate("India"));

    let _ = f.set_city("Mysuru", true);
    assert!(f.is_country_indeterminate("India"));
    assert!(!f.is_country_indeterminate("United States"));

    let _ = f.set_country("India", true);
    assert!(!f.is_country_indeterminate("India"));
}

#[test]
fn indeterminate_is_false_for_unknown_nodes() {
    let f = filter();
    assert!(!f.is_country_indeterminate("Atlantis"));
    assert!(!f.is_state_indeterminate("India", "Goa"));
}

#[test]
fn check_states_render_tri_state() {
    let mut f = filter();
    let _ = f.set_city("Mumbai", true);

    assert_eq!(f.country_check_state("India"), CheckState::Indeterminate);
    assert_eq!(f.state_check_state("India", "Maharashtra"), CheckState::Indeterminate);
    assert_eq!(f.state_check_state("India", "Karnataka"), CheckState::Unchecked);
    assert_eq!(f.city_check_state("Mumbai"), CheckState::Checked);
    assert_eq!(f.city_check_state("Pune"), CheckState::Unchecked);

    let _ = f.set_country("India", true);
    assert_eq!(f.country_check_state("India"), CheckState::Checked);
}

#[test]
fn state_with_every_city_restored_from_url_renders_checked() {
    let selection = LocationSelection {
        cities: set(&["Mumbai", "Pune"]),
        ..LocationSelection::default()
    };
    let f = LocationFilter::with_selection(hierarchy(), selection);

    assert_eq!(f.state_check_state("India", "Maharashtra"), CheckState::Checked);
    assert_eq!(f.state_check_state("India", "Karnataka"), CheckState::Unchecked);
    assert_eq!(f.country_check_state("India"), CheckState::Indeterminate);
}

#[test]
fn country_with_every_state_restored_from_url_renders_checked() {
    let selection = LocationSelection {
        states: set(&["Karnataka", "Maharashtra"]),
        ..LocationSelection::default()
    };
    let f = LocationFilter::with_selection(hierarchy(), selection);

    assert_eq!(f.country_check_state("India"), CheckState::Checked);
    assert!(!f.is_country_indeterminate("India"));
    assert_eq!(f.country_check_state("United States"), CheckState::Unchecked);
}

#[test]
fn country_complete_through_cities_alone_renders_checked() {
    let selection = LocationSelection {
        cities: set(&["Bengaluru", "Mysuru", "Mumbai", "Pune"]),
        ..LocationSelection::default()
    };
    let f = LocationFilter::with_selection(hierarchy(), selection);

    assert_eq!(f.country_check_state("India"), CheckState::Checked);
    assert_eq!(f.state_check_state("India", "Karnataka"), CheckState::Checked);
}

#[test]
fn unknown_nodes_render_from_the_selection_sets() {
    let selection = LocationSelection {
        countries: set(&["Atlantis"]),
        states: set(&["Goa"]),
        ..LocationSelection::default()
    };
    let f = LocationFilter::with_selection(hierarchy(), selection);

    assert_eq!(f.country_check_state("Atlantis"), CheckState::Checked);
    assert_eq!(f.state_check_state("India", "Goa"), CheckState::Checked);
    assert_eq!(f.country_check_state("Lemuria"), CheckState::Unchecked);
}

// ---------------------------------------------------------------------------
// Clear, search, expansion
// ---------------------------------------------------------------------------

#[test]
fn clear_all_keeps_search_and_expansion() {
    let mut f = filter();
    f.toggle_country_expansion("India");
    f.set_search_query("pun");
    let _ = f.set_country("United States", true);
    assert!(f.has_active_filters());

    assert!(f.clear_all().is_changed());
    assert!(!f.has_active_filters());
    assert_eq!(f.search_query(), "pun");
    assert!(f.is_country_expanded("India"));
    assert_eq!(f.clear_all(), FilterChange::Unchanged);
}

#[test]
fn searching_city_expands_its_ancestors() {
    let mut f = filter();
    f.set_search_query("brook");

    let filtered = f.filtered_hierarchy();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].country, "United States");
    assert!(f.is_country_expanded("United States"));
    assert!(f.is_state_expanded("United States", "New York"));
    assert!(!f.is_country_expanded("India"));
}

#[test]
fn new_query_overwrites_previous_expansion() {
    let mut f = filter();
    f.toggle_state_expansion("India", "Karnataka");
    f.set_search_query("pune");

    assert!(!f.is_state_expanded("India", "Karnataka"));
    assert!(f.is_state_expanded("India", "Maharashtra"));
}

#[test]
fn clearing_search_restores_full_hierarchy() {
    let mut f = filter();
    f.set_search_query("pune");
    assert_eq!(f.filtered_hierarchy().len(), 1);

    f.clear_search();
    assert_eq!(f.filtered_hierarchy(), f.hierarchy().to_vec());
    // Expansion from the last search is kept until the user collapses it.
    assert!(f.is_country_expanded("India"));

    f.set_search_query("brooklyn");
    assert!(f.is_country_expanded("United States"));
}

#[test]
fn search_does_not_touch_selection() {
    let mut f = filter();
    let _ = f.set_city("Pune", true);
    f.set_search_query("california");
    assert_eq!(f.selection().cities, set(&["Pune"]));
}

#[test]
fn toggling_expansion_flips_state() {
    let mut f = filter();
    f.toggle_country_expansion("India");
    assert!(f.is_country_expanded("India"));
    f.toggle_country_expansion("India");
    assert!(!f.is_country_expanded("India"));

    f.toggle_state_expansion("India", "Karnataka");
    assert!(f.is_state_expanded("India", "Karnataka"));
    assert!(!f.is_state_expanded("United States", "Karnataka"));
}

#[test]
fn replacing_hierarchy_keeps_seeded_selection_and_reapplies_search() {
    let selection = LocationSelection {
        states: set(&["California"]),
        ..LocationSelection::default()
    };
    let mut f = LocationFilter::with_selection(Arc::from(Vec::new()), selection.clone());
    f.set_search_query("diego");
    assert!(f.filtered_hierarchy().is_empty());

    f.replace_hierarchy(hierarchy());
    assert_eq!(f.selection(), &selection);
    assert!(f.is_state_expanded("United States", "California"));
}

#[test]
fn replace_selection_reports_change() {
    let mut f = filter();
    let next = LocationSelection {
        cities: set(&["Pune"]),
        ..LocationSelection::default()
    };
    assert!(f.replace_selection(next.clone()).is_changed());
    assert_eq!(f.replace_selection(next), FilterChange::Unchanged);
}
