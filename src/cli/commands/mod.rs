use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use crate::api::BchRestClient;
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::processor::SlpToolkit;

pub mod blacklist;
pub mod decode_script;
pub mod hydrate;
pub mod token_tx;
pub mod utxos;
pub mod validate;

/// Backend options shared by every networked command
#[derive(Args, Clone, Debug, Default)]
pub struct BackendArgs {
    /// Config file (default: ./config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// REST API base URL (overrides config.toml)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Token id to quarantine, may be repeated (added to config.toml's list)
    #[arg(long = "blacklist-token", global = true)]
    pub blacklist_tokens: Vec<String>,
}

impl BackendArgs {
    pub fn load_config(&self) -> AppResult<AppConfig> {
        let mut config = AppConfig::load_from(self.config.as_deref())
            .map_err(|e| AppError::Config(format!("Failed to load configuration: {}", e)))?;

        if let Some(url) = &self.api_url {
            config.api.url = url.clone();
        }
        config.slp.blacklist.extend(self.blacklist_tokens.iter().cloned());

        debug!("Using REST API at {}", config.api.url);
        Ok(config)
    }

    pub fn toolkit(&self) -> AppResult<SlpToolkit<BchRestClient>> {
        SlpToolkit::from_config(&self.load_config()?)
    }
}

/// Pretty-print a result as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
