//! SLP processing pipeline
//!
//! - **classifier** - txid to decoded token operation
//! - **metadata** - GENESIS metadata per token id
//! - **validation** - indexer validity verdicts and the token blacklist
//! - **matcher** - UTXO classification
//! - **hydrator** - wallet-facing transaction view
//!
//! [`SlpToolkit`] wires them together over one backend.

pub mod classifier;
pub mod hydrator;
pub mod matcher;
pub mod metadata;
pub mod validation;

pub use classifier::{operation_from_transaction, TokenClassifier};
pub use hydrator::TransactionHydrator;
pub use matcher::UtxoMatcher;
pub use metadata::MetadataResolver;
pub use validation::ValidationGate;

use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use crate::api::{BchRestClient, SlpBackend, TokenMetadataCache};
use crate::config::AppConfig;
use crate::decoder::ParseResult;
use crate::errors::AppResult;
use crate::types::{ClassifiedUtxo, HydratedTransaction, ParsedScript, TokenOperation, ValidationResult};

/// Distinct values, first occurrence wins
pub(crate) fn unique_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Public SLP operations over one backend
pub struct SlpToolkit<B: ?Sized> {
    classifier: TokenClassifier<B>,
    gate: ValidationGate<B>,
    matcher: UtxoMatcher<B>,
    hydrator: TransactionHydrator<B>,
}

impl SlpToolkit<BchRestClient> {
    /// Toolkit over the configured REST backend
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = BchRestClient::new(config.api.clone())?;
        Ok(Self::new(Arc::new(client), config))
    }
}

impl<B> SlpToolkit<B>
where
    B: SlpBackend + ?Sized,
{
    pub fn new(backend: Arc<B>, config: &AppConfig) -> Self {
        Self::build(backend, config, None)
    }

    /// Share a token metadata cache across toolkits and calls
    pub fn with_metadata_cache(backend: Arc<B>, config: &AppConfig, cache: TokenMetadataCache) -> Self {
        Self::build(backend, config, Some(cache))
    }

    fn build(backend: Arc<B>, config: &AppConfig, cache: Option<TokenMetadataCache>) -> Self {
        let concurrency = config.processing.concurrent_requests;

        let mut metadata = MetadataResolver::new(Arc::clone(&backend), concurrency);
        if let Some(cache) = cache {
            metadata = metadata.with_cache(cache);
        }
        let gate = ValidationGate::new(Arc::clone(&backend), config.slp.blacklist_set());

        Self {
            classifier: TokenClassifier::new(Arc::clone(&backend)),
            matcher: UtxoMatcher::new(
                Arc::clone(&backend),
                metadata.clone(),
                gate.clone(),
                concurrency,
            ),
            hydrator: TransactionHydrator::new(backend, metadata, gate.clone(), concurrency),
            gate,
        }
    }

    pub fn parse_token_script(script: &[u8]) -> ParseResult<ParsedScript> {
        crate::decoder::parse_token_script(script)
    }

    pub async fn get_token_operation(&self, txid: &str) -> AppResult<TokenOperation> {
        self.classifier.get_token_operation(txid).await
    }

    pub async fn classify_utxos(&self, utxos: &[Value]) -> AppResult<Vec<ClassifiedUtxo>> {
        self.matcher.classify_utxos(utxos).await
    }

    pub async fn classify_address_utxos(&self, address: &str) -> AppResult<Vec<ClassifiedUtxo>> {
        self.matcher.classify_address_utxos(address).await
    }

    pub async fn hydrate_transaction(&self, txid: &str) -> AppResult<HydratedTransaction> {
        self.hydrator.hydrate_transaction(txid).await
    }

    pub async fn is_valid_slp_txid(&self, txid: &str) -> AppResult<ValidationResult> {
        self.gate.validate_txid(txid).await
    }

    pub async fn is_valid_slp_txids(&self, txids: &[String]) -> AppResult<Vec<ValidationResult>> {
        self.gate.validate_txids(txids).await
    }

    pub async fn check_blacklist(&self, txid: &str) -> bool {
        self.gate.check_blacklist(txid).await
    }
}
