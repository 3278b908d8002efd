//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::atlas::AtlasConfig;
use crate::dashboard::{FetchStrategy, Layout, RenderOptions};
use crate::server::ServerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub atlas: AtlasSection,

    #[serde(default)]
    pub dashboard: DashboardSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Atlas API connection
#[derive(Debug, Clone, Deserialize)]
pub struct AtlasSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means no client-side timeout
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8080/atlas".to_string()
}

impl Default for AtlasSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

/// Dashboard behavior
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSection {
    #[serde(default)]
    pub layout: Layout,

    #[serde(default)]
    pub strategy: FetchStrategy,

    #[serde(default = "default_true")]
    pub unemployment_as_percent: bool,

    #[serde(default = "default_true")]
    pub surface_errors: bool,

    /// Defaults to on for the incremental layout only
    #[serde(default)]
    pub log_payloads: Option<bool>,
}

fn default_true() -> bool {
    true
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            strategy: FetchStrategy::default(),
            unemployment_as_percent: true,
            surface_errors: true,
            log_payloads: None,
        }
    }
}

impl DashboardSection {
    /// Whether received payloads are logged at info level
    pub fn log_payloads(&self) -> bool {
        self.log_payloads
            .unwrap_or(self.layout == Layout::Incremental)
    }
}

/// Dashboard web server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8084
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("atlas-dashboard").join("config.toml")),
            Some(PathBuf::from("/etc/atlas-dashboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Atlas overrides
        if let Some(url) = lookup("ATLAS_BASE_URL") {
            self.atlas.base_url = url;
        }
        if let Some(ms) = lookup("ATLAS_REQUEST_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                self.atlas.request_timeout_ms = Some(ms);
            }
        }

        // Dashboard overrides
        if let Some(layout) = lookup("ATLAS_LAYOUT") {
            match layout.parse() {
                Ok(layout) => self.dashboard.layout = layout,
                Err(e) => tracing::warn!("Ignoring ATLAS_LAYOUT: {}", e),
            }
        }
        if let Some(strategy) = lookup("ATLAS_FETCH_STRATEGY") {
            match strategy.parse() {
                Ok(strategy) => self.dashboard.strategy = strategy,
                Err(e) => tracing::warn!("Ignoring ATLAS_FETCH_STRATEGY: {}", e),
            }
        }
        if let Some(enabled) = lookup("ATLAS_LOG_PAYLOADS") {
            match enabled.parse() {
                Ok(enabled) => self.dashboard.log_payloads = Some(enabled),
                Err(_) => tracing::warn!("Ignoring ATLAS_LOG_PAYLOADS: expected true or false"),
            }
        }

        // Server overrides
        if let Some(host) = lookup("ATLAS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("ATLAS_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("ATLAS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ATLAS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Client settings for the Atlas API
    pub fn atlas_config(&self) -> AtlasConfig {
        AtlasConfig {
            base_url: self.atlas.base_url.clone(),
            request_timeout_ms: self.atlas.request_timeout_ms,
        }
    }

    /// Rendering switches for the dashboard
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            layout: self.dashboard.layout,
            unemployment_as_percent: self.dashboard.unemployment_as_percent,
            surface_errors: self.dashboard.surface_errors,
        }
    }

    /// Web server settings
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            render: self.render_options(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Atlas Dashboard Configuration
#
# Environment variables override these settings:
# - ATLAS_BASE_URL
# - ATLAS_REQUEST_TIMEOUT_MS
# - ATLAS_LAYOUT
# - ATLAS_FETCH_STRATEGY
# - ATLAS_LOG_PAYLOADS
# - ATLAS_HOST
# - ATLAS_PORT
# - ATLAS_LOG_LEVEL
# - ATLAS_LOG_FORMAT

[atlas]
# Base address of the Atlas API
base_url = "http://localhost:8080/atlas"

# Client-side request timeout (ms); leave unset to keep the transport default
# request_timeout_ms = 10000

[dashboard]
# Layout: gated (all cards at once) or incremental (each card as it arrives)
layout = "incremental"

# Fetch strategy: concurrent or sequential (stops at the first failure)
strategy = "concurrent"

# Show the unemployment value with a "%" suffix
unemployment_as_percent = true

# Render failed indicators instead of only logging them
surface_errors = true

# Log every received payload at info level
# (default: on for the incremental layout, off for gated)
# log_payloads = true

[server]
# Dashboard server host
host = "0.0.0.0"

# Dashboard server port
port = 8084

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.atlas.base_url, "http://localhost:8080/atlas");
        assert_eq!(config.atlas.request_timeout_ms, None);
        assert_eq!(config.dashboard.layout, Layout::Incremental);
        assert_eq!(config.dashboard.strategy, FetchStrategy::Concurrent);
        assert!(config.dashboard.surface_errors);
        assert_eq!(config.server.port, 8084);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_log_payloads_follows_layout() {
        let mut config = Config::default();
        assert!(config.dashboard.log_payloads());

        config.dashboard.layout = Layout::Gated;
        assert!(!config.dashboard.log_payloads());

        let vars: HashMap<&str, &str> = [("ATLAS_LOG_PAYLOADS", "true")].into_iter().collect();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert!(config.dashboard.log_payloads());

        let vars: HashMap<&str, &str> = [("ATLAS_LOG_PAYLOADS", "loud")].into_iter().collect();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.dashboard.log_payloads, Some(true));
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.atlas.base_url, default_base_url());
        assert_eq!(config.dashboard.layout, Layout::Incremental);
        assert_eq!(config.dashboard.strategy, FetchStrategy::Concurrent);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[atlas]
base_url = "http://atlas.internal:8080/atlas"
request_timeout_ms = 2500

[dashboard]
layout = "gated"
strategy = "sequential"
unemployment_as_percent = false
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.atlas.base_url, "http://atlas.internal:8080/atlas");
        assert_eq!(config.atlas.request_timeout_ms, Some(2500));
        assert_eq!(config.dashboard.layout, Layout::Gated);
        assert_eq!(config.dashboard.strategy, FetchStrategy::Sequential);
        assert!(!config.dashboard.unemployment_as_percent);
        assert!(config.dashboard.surface_errors);
        assert_eq!(config.server.port, 8084);

        let options = config.render_options();
        assert_eq!(options.layout, Layout::Gated);
        assert!(!options.unemployment_as_percent);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/atlas/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nlayout = \"carousel\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ATLAS_BASE_URL", "http://10.0.0.5:8080/atlas"),
            ("ATLAS_LAYOUT", "gated"),
            ("ATLAS_FETCH_STRATEGY", "bogus"),
            ("ATLAS_PORT", "9000"),
            ("ATLAS_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.atlas.base_url, "http://10.0.0.5:8080/atlas");
        assert_eq!(config.dashboard.layout, Layout::Gated);
        // Invalid values leave the previous setting in place
        assert_eq!(config.dashboard.strategy, FetchStrategy::Concurrent);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.atlas_config().base_url, "http://10.0.0.5:8080/atlas");
    }
}
