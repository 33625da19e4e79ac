//! Token metadata resolution
//!
//! Metadata comes from decoding the token's GENESIS transaction. When that
//! transaction is unavailable or does not decode as the token's GENESIS, the
//! token stats service is asked instead.

use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::api::{RawTransactionSource, TokenMetadataCache, TokenStatsSource};
use crate::errors::{ApiError, AppResult};
use crate::processor::classifier::probe;
use crate::processor::unique_in_order;
use crate::types::{OperationDetails, TokenMetadata};

pub struct MetadataResolver<B: ?Sized> {
    backend: Arc<B>,
    cache: Option<TokenMetadataCache>,
    concurrency: usize,
}

impl<B: ?Sized> Clone for MetadataResolver<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            cache: self.cache.clone(),
            concurrency: self.concurrency,
        }
    }
}

impl<B> MetadataResolver<B>
where
    B: RawTransactionSource + TokenStatsSource + ?Sized,
{
    pub fn new(backend: Arc<B>, concurrency: usize) -> Self {
        Self {
            backend,
            cache: None,
            concurrency: concurrency.max(1),
        }
    }

    /// Share resolved metadata across calls
    pub fn with_cache(mut self, cache: TokenMetadataCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub async fn resolve(&self, token_id: &str) -> AppResult<TokenMetadata> {
        if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(token_id)) {
            return Ok(cached);
        }

        let metadata = match self.from_genesis(token_id).await? {
            Some(metadata) => metadata,
            None => {
                debug!("Falling back to token stats for {}", token_id);
                let stats = self.backend.token_genesis_stats(token_id).await?;
                TokenMetadata::from_stats(token_id, stats)
            }
        };

        if let Some(cache) = &self.cache {
            cache.put(token_id, metadata.clone());
        }
        Ok(metadata)
    }

    /// Resolve each distinct token id once
    pub async fn resolve_many(&self, token_ids: &[String]) -> AppResult<HashMap<String, TokenMetadata>> {
        let distinct = unique_in_order(token_ids.iter().map(String::as_str));

        let results: Vec<AppResult<TokenMetadata>> = stream::iter(distinct.iter())
            .map(|token_id| self.resolve(token_id))
            .buffered(self.concurrency)
            .collect()
            .await;

        distinct
            .into_iter()
            .zip(results)
            .map(|(token_id, result)| result.map(|metadata| (token_id, metadata)))
            .collect()
    }

    async fn from_genesis(&self, token_id: &str) -> AppResult<Option<TokenMetadata>> {
        let transaction = match self.backend.raw_transaction(token_id).await {
            Ok(transaction) => transaction,
            Err(ApiError::TransactionNotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(probe(&transaction).and_then(|operation| match &operation.details {
            OperationDetails::Genesis(genesis) if operation.token_id == token_id => {
                Some(TokenMetadata::from_genesis(&operation, genesis))
            }
            _ => None,
        }))
    }
}
