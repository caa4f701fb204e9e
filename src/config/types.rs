// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub site: SiteConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
}

/// Message store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub path: String,
}

/// Site content configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory holding the static pages
    pub root: String,
    /// Directory holding the HTML templates
    pub templates: String,
    /// Error page served on 404
    pub error_page: String,
    /// Public asset paths and the files backing them. Only paths listed
    /// here are ever resolved against the filesystem.
    #[serde(default = "default_assets")]
    pub assets: HashMap<String, String>,
}

fn default_assets() -> HashMap<String, String> {
    HashMap::from([
        ("/style.css".to_string(), "site/style.css".to_string()),
        ("/logo.png".to_string(), "site/logo.png".to_string()),
    ])
}
