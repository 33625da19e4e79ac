//! Backend seams
//!
//! Every processor talks to the network through these traits so tests can
//! substitute an in-memory backend.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ApiResult;
use crate::types::{RawTransaction, TokenStats, ValidityEntry};

/// Verbose transactions from a full node
#[async_trait]
pub trait RawTransactionSource: Send + Sync {
    async fn raw_transaction(&self, txid: &str) -> ApiResult<RawTransaction>;
}

/// Address UTXO listing (records are normalised by the caller)
#[async_trait]
pub trait UtxoSource: Send + Sync {
    async fn utxos_for_address(&self, address: &str) -> ApiResult<Vec<Value>>;
}

/// Token indexer genesis stats
#[async_trait]
pub trait TokenStatsSource: Send + Sync {
    async fn token_genesis_stats(&self, token_id: &str) -> ApiResult<TokenStats>;
}

/// Token indexer validity verdicts, positionally aligned with the query
#[async_trait]
pub trait ValidityOracle: Send + Sync {
    async fn check_txid_validity(&self, txids: &[String]) -> ApiResult<Vec<Option<ValidityEntry>>>;
}

/// Everything the processors need from one backend
pub trait SlpBackend: RawTransactionSource + UtxoSource + TokenStatsSource + ValidityOracle {}

impl<T> SlpBackend for T where T: RawTransactionSource + UtxoSource + TokenStatsSource + ValidityOracle {}
