use clap::Args;

use crate::cli::commands::{print_json, BackendArgs};
use crate::errors::AppResult;

/// Ask the token indexer whether txids are valid SLP transactions
#[derive(Args)]
pub struct ValidateCommand {
    /// One or more transaction IDs
    #[arg(required = true)]
    pub txids: Vec<String>,
}

impl ValidateCommand {
    pub async fn run(&self, backend: &BackendArgs) -> AppResult<()> {
        let toolkit = backend.toolkit()?;
        match self.txids.as_slice() {
            [txid] => print_json(&toolkit.is_valid_slp_txid(txid).await?),
            txids => print_json(&toolkit.is_valid_slp_txids(txids).await?),
        }
    }
}
