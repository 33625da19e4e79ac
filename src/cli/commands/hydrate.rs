use clap::Args;

use crate::cli::commands::{print_json, BackendArgs};
use crate::errors::AppResult;

/// Show a transaction with input addresses and token amounts resolved
#[derive(Args)]
pub struct HydrateCommand {
    /// Transaction ID
    pub txid: String,
}

impl HydrateCommand {
    pub async fn run(&self, backend: &BackendArgs) -> AppResult<()> {
        let toolkit = backend.toolkit()?;
        let transaction = toolkit.hydrate_transaction(&self.txid).await?;
        print_json(&transaction)
    }
}
