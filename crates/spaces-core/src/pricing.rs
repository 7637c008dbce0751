//! Fixed price buckets and the flat multi-select filter over them.
//!
//! Bucket edges are inclusive on both sides, so 2000, 5000, 8000 and 12000
//! each belong to the two buckets that meet there.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "under-2000")]
    Under2000,
    #[serde(rename = "2000-5000")]
    From2000To5000,
    #[serde(rename = "5000-8000")]
    From5000To8000,
    #[serde(rename = "8000-12000")]
    From8000To12000,
    #[serde(rename = "above-12000")]
    Above12000,
}

impl PriceRange {
    pub const ALL: [PriceRange; 5] = [
        PriceRange::Under2000,
        PriceRange::From2000To5000,
        PriceRange::From5000To8000,
        PriceRange::From8000To12000,
        PriceRange::Above12000,
    ];

    /// Identifier used in URLs and API parameters.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            PriceRange::Under2000 => "under-2000",
            PriceRange::From2000To5000 => "2000-5000",
            PriceRange::From5000To8000 => "5000-8000",
            PriceRange::From8000To12000 => "8000-12000",
            PriceRange::Above12000 => "above-12000",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PriceRange::Under2000 => "Under ₹2,000",
            PriceRange::From2000To5000 => "₹2,000 - ₹5,000",
            PriceRange::From5000To8000 => "₹5,000 - ₹8,000",
            PriceRange::From8000To12000 => "₹8,000 - ₹12,000",
            PriceRange::Above12000 => "Above ₹12,000",
        }
    }

    /// Lower and upper bound, both inclusive. `None` means unbounded.
    #[must_use]
    pub fn bounds(self) -> (Option<Decimal>, Option<Decimal>) {
        let at = |v: i64| Some(Decimal::from(v));
        match self {
            PriceRange::Under2000 => (None, at(2_000)),
            PriceRange::From2000To5000 => (at(2_000), at(5_000)),
            PriceRange::From5000To8000 => (at(5_000), at(8_000)),
            PriceRange::From8000To12000 => (at(8_000), at(12_000)),
            PriceRange::Above12000 => (at(12_000), None),
        }
    }

    #[must_use]
    pub fn contains(self, amount: Decimal) -> bool {
        let (min, max) = self.bounds();
        min.is_none_or(|min| amount >= min) && max.is_none_or(|max| amount <= max)
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PriceRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PriceRange::ALL
            .into_iter()
            .find(|r| r.id() == s)
            .ok_or_else(|| CoreError::UnknownPriceRange(s.to_string()))
    }
}

/// Selected price buckets. Empty means no price filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFilter {
    pub ranges: BTreeSet<PriceRange>,
}

impl PriceFilter {
    #[must_use]
    pub fn new(ranges: impl IntoIterator<Item = PriceRange>) -> Self {
        Self {
            ranges: ranges.into_iter().collect(),
        }
    }

    /// Returns `true` when the selection changed.
    pub fn set_range(&mut self, range: PriceRange, checked: bool) -> bool {
        if checked {
            self.ranges.insert(range)
        } else {
            self.ranges.remove(&range)
        }
    }

    pub fn clear_all(&mut self) -> bool {
        let changed = !self.ranges.is_empty();
        self.ranges.clear();
        changed
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// `true` when no bucket is selected or any selected bucket holds `amount`.
    #[must_use]
    pub fn matches(&self, amount: Decimal) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|r| r.contains(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn boundaries_belong_to_both_neighbours() {
        assert!(PriceRange::Under2000.contains(d(2_000)));
        assert!(PriceRange::From2000To5000.contains(d(2_000)));
        assert!(PriceRange::From2000To5000.contains(d(5_000)));
        assert!(PriceRange::From5000To8000.contains(d(5_000)));
        assert!(PriceRange::From8000To12000.contains(d(12_000)));
        assert!(PriceRange::Above12000.contains(d(12_000)));
    }

    #[test]
    fn interior_values_hit_one_bucket() {
        let hits: Vec<PriceRange> = PriceRange::ALL
            .into_iter()
            .filter(|r| r.contains(d(7_000)))
            .collect();
        assert_eq!(hits, vec![PriceRange::From5000To8000]);

        assert!(PriceRange::Under2000.contains(Decimal::new(19_995, 1)));
        assert!(!PriceRange::Under2000.contains(Decimal::new(20_001, 1)));
        assert!(PriceRange::Above12000.contains(d(50_000)));
        assert!(!PriceRange::Above12000.contains(d(11_999)));
    }

    #[test]
    fn ids_round_trip_through_from_str() {
        for range in PriceRange::ALL {
            assert_eq!(range.id().parse::<PriceRange>(), Ok(range));
            assert_eq!(range.to_string(), range.id());
        }
        assert_eq!(
            "cheap".parse::<PriceRange>(),
            Err(CoreError::UnknownPriceRange("cheap".to_string()))
        );
    }

    #[test]
    fn serde_uses_ids() {
        let json = serde_json::to_string(&PriceRange::From8000To12000).expect("serialize");
        assert_eq!(json, "\"8000-12000\"");
        let parsed: PriceRange = serde_json::from_str("\"under-2000\"").expect("deserialize");
        assert_eq!(parsed, PriceRange::Under2000);
    }

    #[test]
    fn filter_matches_any_selected_bucket() {
        let filter = PriceFilter::new([PriceRange::Under2000, PriceRange::From2000To5000]);
        assert!(filter.matches(d(2_000)));
        assert!(filter.matches(d(5_000)));
        assert!(!filter.matches(d(7_000)));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = PriceFilter::default();
        assert!(!filter.has_active_filters());
        assert!(filter.matches(d(1_000_000)));
    }

    #[test]
    fn toggling_reports_changes() {
        let mut filter = PriceFilter::default();
        assert!(filter.set_range(PriceRange::Above12000, true));
        assert!(!filter.set_range(PriceRange::Above12000, true));
        assert!(filter.has_active_filters());
        assert!(filter.set_range(PriceRange::Above12000, false));
        assert!(!filter.clear_all());
    }
}
