use clap::Args;
use serde_json::json;

use crate::cli::commands::{print_json, BackendArgs};
use crate::errors::AppResult;

/// Check whether a transaction belongs to a blacklisted token
#[derive(Args)]
pub struct BlacklistCommand {
    /// Transaction ID
    pub txid: String,
}

impl BlacklistCommand {
    pub async fn run(&self, backend: &BackendArgs) -> AppResult<()> {
        let toolkit = backend.toolkit()?;
        let blacklisted = toolkit.check_blacklist(&self.txid).await;
        print_json(&json!({ "txid": self.txid, "blacklisted": blacklisted }))
    }
}
