//! SLP Toolkit - Type System
//!
//! - `token`: decoded SLP messages and transaction-level token operations
//! - `utxo`: canonical UTXO shape and its SLP classification
//! - `transaction`: raw full-node transactions and hydrated views of them
//! - `validation`: token indexer validity verdicts
//! - `metadata`: per-token genesis metadata

pub mod metadata;
pub mod token;
pub mod transaction;
pub mod utxo;
pub mod validation;

pub use metadata::{MetadataSource, TokenMetadata, TokenStats};
pub use token::{
    GenesisMessage, GenesisOperation, MintMessage, MintOperation, OperationDetails, OutputRole,
    ParsedScript, SendMessage, SendOperation, SendOutput, SlpMessage, TokenOperation,
    TransactionType,
};
pub use transaction::{
    HydratedInput, HydratedOutput, HydratedTransaction, RawInput, RawOutput, RawTransaction,
    ScriptPubKey, TokenSlot, TokenSummary,
};
pub use utxo::{ClassifiedUtxo, SlpStatus, TokenUtxoDetails, Utxo, UtxoType};
pub use validation::{ValidationResult, ValidityEntry};
