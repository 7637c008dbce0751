//! Filter state encoded as URL query parameters.
//!
//! Keys are `countries`, `states`, `cities` and `priceRanges`; each value is
//! a comma-joined list. Blank list items are dropped when decoding. Other
//! query parameters are passed through untouched when filters are merged
//! back into an existing query string.

use std::collections::BTreeSet;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{CoreError, LocationSelection, PriceRange};

pub const COUNTRIES_KEY: &str = "countries";
pub const STATES_KEY: &str = "states";
pub const CITIES_KEY: &str = "cities";
pub const PRICE_RANGES_KEY: &str = "priceRanges";

const FILTER_KEYS: [&str; 4] = [COUNTRIES_KEY, STATES_KEY, CITIES_KEY, PRICE_RANGES_KEY];

/// Form-style component encoding: everything except `A-Z a-z 0-9 - _ . ~`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub location: LocationSelection,
    pub price_ranges: BTreeSet<PriceRange>,
}

impl FilterParams {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.location.is_empty() && self.price_ranges.is_empty()
    }

    /// Decode filter state from a query string (with or without a leading `?`).
    ///
    /// Unknown price range ids are skipped with a warning so a stale link
    /// still restores whatever it can.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in parse_query_pairs(query) {
            match key.as_str() {
                COUNTRIES_KEY => params.location.countries = parse_list(Some(&value)),
                STATES_KEY => params.location.states = parse_list(Some(&value)),
                CITIES_KEY => params.location.cities = parse_list(Some(&value)),
                PRICE_RANGES_KEY => {
                    params.price_ranges = parse_list(Some(&value))
                        .into_iter()
                        .filter_map(|id| match id.parse::<PriceRange>() {
                            Ok(range) => Some(range),
                            Err(e) => {
                                tracing::warn!(error = %e, "ignoring price range from url");
                                None
                            }
                        })
                        .collect();
                }
                _ => {}
            }
        }
        params
    }

    /// Encode the non-empty filter lists as a query string without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.encoded_pairs().join("&")
    }

    /// Replace the filter keys in `existing` with this state, keeping every
    /// other parameter in its original position and encoding.
    #[must_use]
    pub fn merge_into(&self, existing: &str) -> String {
        let mut segments: Vec<String> = split_segments(existing)
            .filter(|segment| {
                let raw_key = segment.split_once('=').map_or(*segment, |(k, _)| k);
                !FILTER_KEYS.contains(&decode_component(raw_key).as_str())
            })
            .map(str::to_string)
            .collect();
        segments.extend(self.encoded_pairs());
        segments.join("&")
    }

    fn encoded_pairs(&self) -> Vec<String> {
        let prices: Vec<&str> = self.price_ranges.iter().map(|r| r.id()).collect();
        [
            (COUNTRIES_KEY, join(&self.location.countries)),
            (STATES_KEY, join(&self.location.states)),
            (CITIES_KEY, join(&self.location.cities)),
            (PRICE_RANGES_KEY, prices.join(",")),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={}", encode_component(&value)))
        .collect()
    }
}

/// Split a comma-joined list, trimming items and dropping blank ones.
#[must_use]
pub fn parse_list(value: Option<&str>) -> BTreeSet<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strict variant of the `priceRanges` decoding used by the API.
///
/// # Errors
///
/// Returns [`CoreError::UnknownPriceRange`] for the first id that is not a
/// known bucket.
pub fn parse_price_ranges(value: Option<&str>) -> Result<BTreeSet<PriceRange>, CoreError> {
    parse_list(value)
        .iter()
        .map(|id| id.parse::<PriceRange>())
        .collect()
}

/// Decode `key=value` pairs from a query string. Keys without `=` get an
/// empty value.
#[must_use]
pub fn parse_query_pairs(query: &str) -> Vec<(String, String)> {
    split_segments(query)
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn split_segments(query: &str) -> impl Iterator<Item = &str> {
    query
        .strip_prefix('?')
        .unwrap_or(query)
        .split('&')
        .filter(|segment| !segment.is_empty())
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT)
        .to_string()
        .replace("%20", "+")
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn parse_list_drops_blank_items() {
        assert_eq!(parse_list(Some("Mumbai, ,Pune,")), set(&["Mumbai", "Pune"]));
        assert!(parse_list(Some("")).is_empty());
        assert!(parse_list(None).is_empty());
    }

    #[test]
    fn from_query_decodes_lists() {
        let params = FilterParams::from_query(
            "?countries=India&cities=New+York%2CLos%20Angeles&priceRanges=under-2000,above-12000",
        );
        assert_eq!(params.location.countries, set(&["India"]));
        assert!(params.location.states.is_empty());
        assert_eq!(params.location.cities, set(&["Los Angeles", "New York"]));
        assert_eq!(
            params.price_ranges.into_iter().collect::<Vec<_>>(),
            vec![PriceRange::Under2000, PriceRange::Above12000]
        );
    }

    #[test]
    fn from_query_skips_unknown_price_ids() {
        let params = FilterParams::from_query("priceRanges=cheap,2000-5000");
        assert_eq!(
            params.price_ranges.into_iter().collect::<Vec<_>>(),
            vec![PriceRange::From2000To5000]
        );
    }

    #[test]
    fn strict_price_parsing_rejects_unknown_ids() {
        assert_eq!(
            parse_price_ranges(Some("under-2000,cheap")),
            Err(CoreError::UnknownPriceRange("cheap".to_string()))
        );
        assert!(parse_price_ranges(None).expect("empty is fine").is_empty());
    }

    #[test]
    fn to_query_string_omits_empty_lists() {
        let params = FilterParams {
            location: LocationSelection {
                states: set(&["Tamil Nadu"]),
                cities: set(&["Chennai", "Madurai"]),
                ..LocationSelection::default()
            },
            price_ranges: [PriceRange::From5000To8000].into_iter().collect(),
        };
        assert_eq!(
            params.to_query_string(),
            "states=Tamil+Nadu&cities=Chennai%2CMadurai&priceRanges=5000-8000"
        );
        assert_eq!(FilterParams::default().to_query_string(), "");
    }

    #[test]
    fn encoded_state_decodes_to_the_same_filters() {
        let params = FilterParams {
            location: LocationSelection {
                countries: set(&["Côte d'Ivoire"]),
                cities: set(&["São Paulo"]),
                ..LocationSelection::default()
            },
            price_ranges: BTreeSet::new(),
        };
        assert_eq!(FilterParams::from_query(&params.to_query_string()), params);
    }

    #[test]
    fn merge_keeps_unrelated_params_and_replaces_filters() {
        let params = FilterParams {
            location: LocationSelection {
                cities: set(&["Pune"]),
                ..LocationSelection::default()
            },
            price_ranges: BTreeSet::new(),
        };
        let merged = params.merge_into("?tab=grid&countries=India&utm_source=mail%20x&cities=Mumbai");
        assert_eq!(merged, "tab=grid&utm_source=mail%20x&cities=Pune");
    }

    #[test]
    fn merging_empty_filters_removes_all_filter_keys() {
        let merged = FilterParams::default().merge_into("countries=India&page=2&priceRanges=under-2000");
        assert_eq!(merged, "page=2");
    }
}
