//! Command handlers. All of them work on the local data file; none talk to a
//! running server.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;

use spaces_core::url_params::{parse_list, parse_price_ranges};
use spaces_core::{
    filter_hierarchy, load_categories, CategoryCatalog, CountryNode, ListingQuery, ListingStore,
    LocationRecord, LocationSelection, PriceFilter, QueryResult,
};

#[derive(Debug)]
pub(crate) struct QueryArgs {
    pub category: String,
    pub countries: Option<String>,
    pub states: Option<String>,
    pub cities: Option<String>,
    pub price_ranges: Option<String>,
    pub json: bool,
}

impl QueryArgs {
    pub(crate) fn to_query(&self) -> anyhow::Result<ListingQuery> {
        Ok(ListingQuery {
            category: Some(self.category.clone()),
            location: LocationSelection {
                countries: parse_list(self.countries.as_deref()),
                states: parse_list(self.states.as_deref()),
                cities: parse_list(self.cities.as_deref()),
            },
            price: PriceFilter::new(parse_price_ranges(self.price_ranges.as_deref())?),
        })
    }
}

fn catalog(categories_path: Option<&Path>) -> anyhow::Result<CategoryCatalog> {
    Ok(match categories_path {
        Some(path) => load_categories(path)?,
        None => CategoryCatalog::builtin(),
    })
}

pub(crate) fn run_hierarchy(data_path: &Path, search: Option<&str>) -> anyhow::Result<()> {
    let store = ListingStore::load(data_path)?;
    let tree = filter_hierarchy(&store.hierarchy(), search.unwrap_or_default());
    if tree.is_empty() {
        println!("no locations match");
        return Ok(());
    }
    print!("{}", render_hierarchy(&tree));
    Ok(())
}

pub(crate) fn run_query(
    data_path: &Path,
    categories_path: Option<&Path>,
    args: &QueryArgs,
) -> anyhow::Result<()> {
    let store = ListingStore::load(data_path)?;
    let catalog = catalog(categories_path)?;
    let result = store.query(&catalog, &args.to_query()?)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_listings(&result));
    }
    Ok(())
}

pub(crate) fn run_categories(categories_path: Option<&Path>) -> anyhow::Result<()> {
    let catalog = catalog(categories_path)?;
    for category in catalog.all() {
        let tags = if category.is_all_spaces() {
            "(every record)".to_string()
        } else {
            category.source_tags.join(", ")
        };
        println!("{:<14} {:<14} {tags}", category.id, category.label);
    }
    Ok(())
}

pub(crate) fn run_validate(data_path: &Path, categories_path: Option<&Path>) -> anyhow::Result<()> {
    let store = ListingStore::load(data_path)?;
    let catalog = catalog(categories_path)?;
    let report = validate_records(store.records(), &catalog);

    println!("records:             {}", report.records);
    println!("incomplete location: {}", report.incomplete_places.len());
    for (category, count) in &report.per_category {
        println!("  {category:<14} {count}");
    }
    for id in &report.incomplete_places {
        tracing::warn!(id = %id, "record has no complete country/state/city");
    }

    if !report.duplicate_ids.is_empty() || !report.untagged.is_empty() {
        anyhow::bail!(
            "data check failed: {} duplicate id(s) [{}], {} record(s) with unknown source tag [{}]",
            report.duplicate_ids.len(),
            report.duplicate_ids.join(", "),
            report.untagged.len(),
            report.untagged.join(", ")
        );
    }
    println!("ok");
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ValidationReport {
    pub records: usize,
    pub duplicate_ids: Vec<String>,
    /// Records whose source tag no category lists.
    pub untagged: Vec<String>,
    pub incomplete_places: Vec<String>,
    /// Record count per non-`all-spaces` category, in catalog order.
    pub per_category: Vec<(String, usize)>,
}

pub(crate) fn validate_records(
    records: &[LocationRecord],
    catalog: &CategoryCatalog,
) -> ValidationReport {
    let mut seen = HashSet::new();
    let mut report = ValidationReport {
        records: records.len(),
        ..ValidationReport::default()
    };
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for record in records {
        if !seen.insert(record.id.as_str()) {
            report.duplicate_ids.push(record.id.clone());
        }
        if record.place().is_none() {
            report.incomplete_places.push(record.id.clone());
        }

        let mut tagged = false;
        for category in catalog.all().iter().filter(|c| !c.is_all_spaces()) {
            if category.includes_tag(&record.source_file) {
                tagged = true;
                *counts.entry(category.id.as_str()).or_default() += 1;
            }
        }
        if !tagged {
            report.untagged.push(record.id.clone());
        }
    }

    report.per_category = catalog
        .all()
        .iter()
        .filter(|c| !c.is_all_spaces())
        .map(|c| (c.id.clone(), counts.get(c.id.as_str()).copied().unwrap_or(0)))
        .collect();
    report
}

pub(crate) fn render_hierarchy(tree: &[CountryNode]) -> String {
    let mut out = String::new();
    for country in tree {
        let _ = writeln!(out, "{}", country.country);
        for state in &country.states {
            let _ = writeln!(out, "  {}", state.state);
            for city in &state.cities {
                let _ = writeln!(out, "    {city}");
            }
        }
    }
    out
}

pub(crate) fn render_listings(result: &QueryResult) -> String {
    let mut out = String::new();
    for record in &result.items {
        let place = record.place().map_or_else(
            || "(no location)".to_string(),
            |p| format!("{}, {}, {}", p.city, p.state, p.country),
        );
        let _ = writeln!(
            out,
            "{:<12} {:<32} {:<36} {} {}/{}",
            record.id, record.title, place, record.price.currency, record.price.amount, record.price.period
        );
    }
    let noun = if result.total == 1 { "space" } else { "spaces" };
    let _ = writeln!(out, "{} {noun}", result.total);
    out
}
