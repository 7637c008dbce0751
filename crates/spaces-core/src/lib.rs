pub mod app_config;
pub mod categories;
pub mod config;
pub mod error;
pub mod filter;
pub mod hierarchy;
pub mod pricing;
pub mod query;
pub mod records;
pub mod search;
pub mod store;
pub mod url_params;

pub use app_config::{AppConfig, Environment};
pub use categories::{load_categories, CategoryCatalog, CategoryConfig, ALL_SPACES};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError, DataError};
pub use filter::{CheckState, FilterChange, LocationFilter, LocationSelection};
pub use hierarchy::{build_hierarchy, CountryNode, StateNode};
pub use pricing::{PriceFilter, PriceRange};
pub use query::{query_listings, ListingQuery, QueryResult};
pub use records::{load_locations, parse_locations, LocationRecord, LocationsFile, Place, Price, Rating};
pub use search::{expansion_for, filter_hierarchy};
pub use store::ListingStore;
pub use url_params::FilterParams;
