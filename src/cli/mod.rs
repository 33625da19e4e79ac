use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

use commands::BackendArgs;

/// Bitcoin Cash SLP token toolkit
#[derive(Parser)]
#[command(name = "bch-slp-toolkit")]
#[command(about = "Decode SLP OP_RETURNs, classify token UTXOs and hydrate token transactions")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub backend: BackendArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Decode a hex-encoded SLP OP_RETURN script (offline)
    DecodeScript(commands::decode_script::DecodeScriptCommand),
    /// Decode the token operation of a transaction
    TokenTx(commands::token_tx::TokenTxCommand),
    /// Classify the UTXOs of an address
    Utxos(commands::utxos::UtxosCommand),
    /// Hydrate a transaction with addresses and token amounts
    Hydrate(commands::hydrate::HydrateCommand),
    /// Check SLP validity of one or more txids
    Validate(commands::validate::ValidateCommand),
    /// Check whether a transaction belongs to a blacklisted token
    Blacklist(commands::blacklist::BlacklistCommand),
}

pub async fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::DecodeScript(command) => command.run(),
        Commands::TokenTx(command) => command.run(&cli.backend).await,
        Commands::Utxos(command) => command.run(&cli.backend).await,
        Commands::Hydrate(command) => command.run(&cli.backend).await,
        Commands::Validate(command) => command.run(&cli.backend).await,
        Commands::Blacklist(command) => command.run(&cli.backend).await,
    }
}
