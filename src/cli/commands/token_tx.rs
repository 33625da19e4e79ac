use clap::Args;

use crate::cli::commands::{print_json, BackendArgs};
use crate::errors::AppResult;

/// Decode the token operation carried by a transaction
#[derive(Args)]
pub struct TokenTxCommand {
    /// Transaction ID
    pub txid: String,
}

impl TokenTxCommand {
    pub async fn run(&self, backend: &BackendArgs) -> AppResult<()> {
        let toolkit = backend.toolkit()?;
        let operation = toolkit.get_token_operation(&self.txid).await?;
        print_json(&operation)
    }
}
