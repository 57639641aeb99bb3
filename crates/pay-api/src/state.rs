//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the server configuration and the charge outcome generator.

use pay_core::{outcome_generator, BoxedOutcomeGenerator, PaymentError, PaymentResult};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Locations searched for the optional config file
const CONFIG_PATHS: [&str; 3] = [
    "config/payment.toml",
    "../config/payment.toml",
    "../../config/payment.toml",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(PaymentError::Configuration(format!(
                "LOG_FORMAT must be text or json, got {}",
                other
            ))),
        }
    }
}

/// Application configuration.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum time to read a request body
    pub read_timeout: Duration,
    /// Maximum time to read request headers
    pub read_header_timeout: Duration,
    /// Maximum time to produce a response
    pub write_timeout: Duration,
    /// Log output format
    pub log_format: LogFormat,
    /// Fixed seed for reproducible charge outcomes
    pub outcome_seed: Option<u64>,
    /// Config file the values were read from, if any
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            read_timeout: Duration::from_secs(30),
            read_header_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(30),
            log_format: LogFormat::Text,
            outcome_seed: None,
            source: None,
        }
    }
}

/// Optional overrides read from `payment.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    read_timeout_secs: Option<u64>,
    read_header_timeout_secs: Option<u64>,
    write_timeout_secs: Option<u64>,
    log_format: Option<LogFormat>,
    outcome_seed: Option<u64>,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file (if any), then
    /// environment variables.
    ///
    /// Nothing is logged here; the subscriber depends on the result.
    pub fn load() -> PaymentResult<Self> {
        dotenvy::dotenv().ok();
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`AppConfig::load`] with environment variables resolved through `lookup`
    fn load_with(lookup: impl Fn(&str) -> Option<String>) -> PaymentResult<Self> {
        let mut config = Self::default();

        if let Some((path, file)) = load_config_file(lookup("PAYMENT_CONFIG"))? {
            config.apply_file(file);
            config.source = Some(path);
        }

        config.apply_env(lookup)?;

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(secs) = file.read_timeout_secs {
            self.read_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.read_header_timeout_secs {
            self.read_header_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.write_timeout_secs {
            self.write_timeout = Duration::from_secs(secs);
        }
        if let Some(format) = file.log_format {
            self.log_format = format;
        }
        if file.outcome_seed.is_some() {
            self.outcome_seed = file.outcome_seed;
        }
    }

    /// Overlay environment variables, resolved through `lookup`
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> PaymentResult<()> {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_var("PORT", &port)?;
        }
        if let Some(secs) = lookup("READ_TIMEOUT_SECS") {
            self.read_timeout = Duration::from_secs(parse_var("READ_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = lookup("READ_HEADER_TIMEOUT_SECS") {
            self.read_header_timeout =
                Duration::from_secs(parse_var("READ_HEADER_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = lookup("WRITE_TIMEOUT_SECS") {
            self.write_timeout = Duration::from_secs(parse_var("WRITE_TIMEOUT_SECS", &secs)?);
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.log_format = format.parse()?;
        }
        if let Some(seed) = lookup("OUTCOME_SEED") {
            self.outcome_seed = Some(parse_var("OUTCOME_SEED", &seed)?);
        }
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> PaymentResult<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            PaymentError::Configuration(format!("Invalid host address: {}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> PaymentResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PaymentError::Configuration(format!("Invalid value for {}: {}", key, value)))
}

/// Find and parse the config file.
///
/// An explicit path (`PAYMENT_CONFIG`) must exist; otherwise the default
/// locations are searched and a missing file is not an error.
fn load_config_file(explicit: Option<String>) -> PaymentResult<Option<(PathBuf, FileConfig)>> {
    if let Some(path) = explicit {
        let path = PathBuf::from(path);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            PaymentError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file = parse_config_file(&path, &content)?;
        return Ok(Some((path, file)));
    }

    for path in CONFIG_PATHS {
        if let Ok(content) = std::fs::read_to_string(path) {
            let file = parse_config_file(Path::new(path), &content)?;
            return Ok(Some((PathBuf::from(path), file)));
        }
    }

    Ok(None)
}

fn parse_config_file(path: &Path, content: &str) -> PaymentResult<FileConfig> {
    toml::from_str(content).map_err(|e| {
        PaymentError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Charge outcome generator
    pub outcomes: BoxedOutcomeGenerator,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create an AppState for an explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        let outcomes = outcome_generator(config.outcome_seed);
        Self::from_parts(config, outcomes)
    }

    /// Create an AppState with a specific outcome generator
    pub fn from_parts(config: AppConfig, outcomes: BoxedOutcomeGenerator) -> Self {
        Self {
            outcomes,
            config: Arc::new(config),
        }
    }
}
