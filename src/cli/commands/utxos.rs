use clap::Args;
use tracing::info;

use crate::cli::commands::{print_json, BackendArgs};
use crate::errors::AppResult;
use crate::types::SlpStatus;

/// Classify an address's UTXOs as token, mint baton, plain BCH or quarantined
#[derive(Args)]
pub struct UtxosCommand {
    /// Address (cashaddr or legacy)
    pub address: String,

    /// Only print UTXOs that are safe to spend as plain BCH
    #[arg(long)]
    pub spendable_only: bool,
}

impl UtxosCommand {
    pub async fn run(&self, backend: &BackendArgs) -> AppResult<()> {
        let toolkit = backend.toolkit()?;
        let mut utxos = toolkit.classify_address_utxos(&self.address).await?;

        let quarantined = utxos
            .iter()
            .filter(|utxo| utxo.status() == SlpStatus::Quarantined)
            .count();
        if quarantined > 0 {
            info!("{} UTXOs quarantined by the token blacklist", quarantined);
        }

        if self.spendable_only {
            utxos.retain(|utxo| utxo.is_spendable_as_bch());
        }
        print_json(&utxos)
    }
}
