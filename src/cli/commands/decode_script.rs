use clap::Args;
use tracing::info;

use crate::cli::commands::print_json;
use crate::decoder::parse_token_script_hex;
use crate::errors::AppResult;

/// Decode a hex-encoded SLP OP_RETURN script offline
#[derive(Args)]
pub struct DecodeScriptCommand {
    /// Output script hex, starting with 6a (OP_RETURN)
    pub script_hex: String,
}

impl DecodeScriptCommand {
    pub fn run(&self) -> AppResult<()> {
        let parsed = parse_token_script_hex(self.script_hex.trim())?;
        info!("Decoded {} message", parsed.transaction_type());
        print_json(&parsed)
    }
}
