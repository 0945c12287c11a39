//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Command-line flags (applied by the caller)
//! 2. Environment variables (`WORKLOG_*`)
//! 3. Config file (`~/.worklog/config.toml`)
//! 4. Defaults

use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Port the storage endpoint listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 3000;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage endpoint listener.
    pub server: ServerConfig,

    /// Persisted collection.
    pub storage: StorageConfig,

    /// Tracker-side connection to the storage endpoint.
    pub client: ClientConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Listen port.
    pub port: u16,
}

impl ServerConfig {
    /// Socket address to bind.
    ///
    /// `host` may be an IPv4 or IPv6 literal (brackets optional) or a hostname,
    /// which is resolved and its first address used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host cannot be resolved.
    pub async fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        tokio::net::lookup_host((host, self.port))
            .await
            .map_err(|e| Error::Config(format!("cannot resolve listen host {}: {e}", self.host)))?
            .next()
            .ok_or_else(|| Error::Config(format!("listen host {} has no address", self.host)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the JSON file holding every saved session.
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_worklog_home().join("sessions.json"),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the storage endpoint.
    pub endpoint: String,

    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl ClientConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("http://127.0.0.1:{DEFAULT_PORT}"),
            timeout_seconds: 5,
        }
    }
}

/// Get the default worklog home directory.
#[must_use]
pub fn default_worklog_home() -> PathBuf {
    if let Ok(home) = env::var("WORKLOG_HOME") {
        return PathBuf::from(home);
    }
    dirs::home_dir().map_or_else(|| PathBuf::from(".worklog"), |h| h.join(".worklog"))
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let config_path = get_config_path();
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        config = parse_config(&contents)?;
    }

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Parse a TOML config document.
///
/// # Errors
///
/// Returns [`Error::Config`] if the document is not valid TOML or has the wrong shape.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
}

/// Get the path to the config file.
fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("WORKLOG_CONFIG") {
        return PathBuf::from(path);
    }

    default_worklog_home().join("config.toml")
}

/// Apply environment variable overrides to config.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(host) = env::var("WORKLOG_HOST") {
        config.server.host = host;
    }

    if let Ok(val) = env::var("WORKLOG_PORT") {
        if let Ok(port) = val.parse() {
            config.server.port = port;
        }
    }

    if let Ok(path) = env::var("WORKLOG_DATA_FILE") {
        config.storage.data_file = PathBuf::from(path);
    }

    if let Ok(endpoint) = env::var("WORKLOG_ENDPOINT") {
        config.client.endpoint = endpoint;
    }

    if let Ok(val) = env::var("WORKLOG_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.client.timeout_seconds = secs;
        }
    }
}
