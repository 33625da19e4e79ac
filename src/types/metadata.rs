//! Token genesis metadata

use serde::{Deserialize, Serialize};

use super::token::{GenesisOperation, TokenOperation};

/// Where a metadata record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataSource {
    /// Decoded from the GENESIS OP_RETURN
    GenesisTransaction,
    /// Reported by the token stats service
    TokenStats,
}

/// Immutable per-token data used to annotate UTXOs and transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub token_id: String,
    pub token_type: u16,
    pub ticker: String,
    pub name: String,
    pub document_uri: String,
    pub document_hash: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_baton_is_active: Option<bool>,
    pub source: MetadataSource,
}

impl TokenMetadata {
    pub fn from_genesis(operation: &TokenOperation, genesis: &GenesisOperation) -> Self {
        Self {
            token_id: operation.token_id.clone(),
            token_type: operation.token_type,
            ticker: genesis.ticker.clone(),
            name: genesis.name.clone(),
            document_uri: genesis.document_uri.clone(),
            document_hash: genesis.document_hash.clone(),
            decimals: genesis.decimals,
            mint_baton_is_active: None,
            source: MetadataSource::GenesisTransaction,
        }
    }

    pub fn from_stats(token_id: &str, stats: TokenStats) -> Self {
        Self {
            token_id: token_id.to_string(),
            token_type: stats.token_type.unwrap_or(1),
            ticker: stats.ticker,
            name: stats.name,
            document_uri: stats.document_uri,
            document_hash: stats.document_hash,
            decimals: stats.decimals,
            mint_baton_is_active: stats.mint_baton_is_active,
            source: MetadataSource::TokenStats,
        }
    }
}

/// Token stats as reported by the REST indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    #[serde(default, alias = "id")]
    pub token_id: Option<String>,
    #[serde(default, alias = "type", alias = "versionType")]
    pub token_type: Option<u16>,
    #[serde(alias = "symbol")]
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub document_uri: String,
    #[serde(default)]
    pub document_hash: String,
    pub decimals: u8,
    #[serde(default, alias = "containsBaton")]
    pub mint_baton_is_active: Option<bool>,
}
