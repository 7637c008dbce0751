mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use spaces_core::{AppConfig, ConfigError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "spaces-cli")]
#[command(about = "Browse and check the spaces listing data offline")]
struct Cli {
    /// Locations data file (defaults to SPACES_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Category table YAML (defaults to SPACES_CATEGORIES_PATH, then the built-in table)
    #[arg(long, global = true)]
    categories: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the country → state → city tree
    Hierarchy {
        /// Only show branches matching this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Run a listing query against the data file
    Query {
        #[arg(long, default_value = spaces_core::ALL_SPACES)]
        category: String,
        /// Comma-separated country names
        #[arg(long)]
        countries: Option<String>,
        /// Comma-separated state names
        #[arg(long)]
        states: Option<String>,
        /// Comma-separated city names
        #[arg(long)]
        cities: Option<String>,
        /// Comma-separated price range ids (e.g. under-2000,2000-5000)
        #[arg(long)]
        price_ranges: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the configured categories
    Categories,
    /// Check the data file against the category table
    Validate,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("spaces-cli: use --help to list commands");
        return Ok(());
    };

    let config = spaces_core::load_app_config_from_env();
    let log_level = config
        .as_ref()
        .map_or_else(|_| "info".to_string(), |c| c.log_level.clone());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let (data_path, categories_path) = resolve_paths(cli.data, cli.categories, config)?;

    match command {
        Commands::Hierarchy { search } => {
            commands::run_hierarchy(&data_path, search.as_deref())?;
        }
        Commands::Query {
            category,
            countries,
            states,
            cities,
            price_ranges,
            json,
        } => {
            let args = commands::QueryArgs {
                category,
                countries,
                states,
                cities,
                price_ranges,
                json,
            };
            commands::run_query(&data_path, categories_path.as_deref(), &args)?;
        }
        Commands::Categories => commands::run_categories(categories_path.as_deref())?,
        Commands::Validate => {
            commands::run_validate(&data_path, categories_path.as_deref())?;
        }
    }

    Ok(())
}

/// Pick the data and category paths, flags first. A broken environment is
/// only fatal when `--data` was not given.
fn resolve_paths(
    data: Option<PathBuf>,
    categories: Option<PathBuf>,
    config: Result<AppConfig, ConfigError>,
) -> anyhow::Result<(PathBuf, Option<PathBuf>)> {
    match (data, config) {
        (data, Ok(config)) => Ok((
            data.unwrap_or(config.data_path),
            categories.or(config.categories_path),
        )),
        (Some(data), Err(e)) => {
            tracing::warn!(error = %e, "ignoring invalid environment configuration");
            Ok((data, categories))
        }
        (None, Err(e)) => Err(e.into()),
    }
}
