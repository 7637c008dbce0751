use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Settings shared by the server, the browse client, and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub data_path: PathBuf,
    /// When unset the built-in category table is used.
    pub categories_path: Option<PathBuf>,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub api_base_url: String,
    pub client_timeout_secs: u64,
    pub url_sync_debounce_ms: u64,
}
