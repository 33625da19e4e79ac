use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: RestApiConfig,
    pub processing: ProcessingConfig,
    pub slp: SlpConfig,
}

/// REST backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestApiConfig {
    pub url: String,
    pub timeout_seconds: u64,
    /// Retries after the first attempt
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            url: "https://api.fullstack.cash/v5".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            initial_backoff_ms: 250,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Independent network calls in flight within one operation
    pub concurrent_requests: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlpConfig {
    /// Token ids whose transactions are quarantined
    #[serde(default)]
    pub blacklist: Vec<String>,
}

impl SlpConfig {
    pub fn blacklist_set(&self) -> HashSet<String> {
        self.blacklist
            .iter()
            .map(|id| id.trim().to_ascii_lowercase())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load with an explicit config file in place of `./config.toml`
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let api = RestApiConfig::default();
        let processing = ProcessingConfig::default();

        let mut builder = Config::builder()
            .set_default("api.url", api.url)?
            .set_default("api.timeout_seconds", api.timeout_seconds)?
            .set_default("api.max_retries", api.max_retries as i64)?
            .set_default("api.initial_backoff_ms", api.initial_backoff_ms)?
            .set_default("api.backoff_multiplier", api.backoff_multiplier)?
            .set_default("api.max_backoff_seconds", api.max_backoff_seconds)?
            .set_default(
                "processing.concurrent_requests",
                processing.concurrent_requests as i64,
            )?
            .set_default("slp.blacklist", Vec::<String>::new())?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // SLP__API__URL, SLP__SLP__BLACKLIST="id1,id2", ...
        let config = builder
            .add_source(
                Environment::with_prefix("SLP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("slp.blacklist")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;

        if app_config.processing.concurrent_requests == 0 {
            return Err(ConfigError::Message(
                "processing.concurrent_requests must be at least 1".to_string(),
            ));
        }

        Ok(app_config)
    }

    /// Defaults for CLI use when no config can be loaded
    pub fn get_defaults() -> Self {
        Self::load().unwrap_or_default()
    }
}
