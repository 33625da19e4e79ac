//! UTXO-to-token matcher
//!
//! Classifies a wallet's UTXOs as token, mint baton, plain BCH or quarantined.
//! Each distinct parent transaction is decoded once, metadata is resolved once
//! per distinct token, and all matched txids are validated in one request.

use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::SlpBackend;
use crate::errors::AppResult;
use crate::processor::classifier::TokenClassifier;
use crate::processor::metadata::MetadataResolver;
use crate::processor::unique_in_order;
use crate::processor::validation::ValidationGate;
use crate::types::{
    ClassifiedUtxo, OperationDetails, OutputRole, TokenMetadata, TokenOperation,
    TokenUtxoDetails, Utxo, UtxoType,
};
use crate::utils::amount::{format_quantity, scale_quantity};

/// UTXO whose vout is part of its parent's token operation
struct Candidate<'a> {
    index: usize,
    role: OutputRole,
    operation: &'a TokenOperation,
}

pub struct UtxoMatcher<B: ?Sized> {
    backend: Arc<B>,
    classifier: TokenClassifier<B>,
    metadata: MetadataResolver<B>,
    gate: ValidationGate<B>,
    concurrency: usize,
}

impl<B> UtxoMatcher<B>
where
    B: SlpBackend + ?Sized,
{
    pub fn new(
        backend: Arc<B>,
        metadata: MetadataResolver<B>,
        gate: ValidationGate<B>,
        concurrency: usize,
    ) -> Self {
        Self {
            classifier: TokenClassifier::new(Arc::clone(&backend)),
            backend,
            metadata,
            gate,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch an address's UTXOs and classify them
    pub async fn classify_address_utxos(&self, address: &str) -> AppResult<Vec<ClassifiedUtxo>> {
        let records = self.backend.utxos_for_address(address).await?;
        debug!("{} UTXOs returned for {}", records.len(), address);
        self.classify_utxos(&records).await
    }

    /// Classify indexer UTXO records, preserving input order
    ///
    /// Any record without a txid, vout and value fails the whole call with
    /// `AppError::MalformedUtxo`.
    pub async fn classify_utxos(&self, records: &[Value]) -> AppResult<Vec<ClassifiedUtxo>> {
        let utxos = records
            .iter()
            .enumerate()
            .map(|(index, record)| Utxo::from_json(index, record))
            .collect::<AppResult<Vec<_>>>()?;

        let operations = self.probe_parents(&utxos).await?;

        let mut classified: Vec<Option<ClassifiedUtxo>> = vec![None; utxos.len()];
        let mut candidates = Vec::new();

        for (index, utxo) in utxos.iter().enumerate() {
            let Some(operation) = operations.get(&utxo.txid).and_then(Option::as_ref) else {
                classified[index] = Some(ClassifiedUtxo::not_token(utxo.clone()));
                continue;
            };

            if self.gate.is_blacklisted_token(&operation.token_id) {
                debug!("{} quarantined: token {} is blacklisted", utxo.outpoint(), operation.token_id);
                classified[index] = Some(ClassifiedUtxo::quarantined(utxo.clone()));
                continue;
            }

            match operation.output_role(utxo.vout) {
                Some(role) => candidates.push(Candidate {
                    index,
                    role,
                    operation,
                }),
                None => {
                    debug!(
                        "{} is outside the {} recipient set",
                        utxo.outpoint(),
                        operation.transaction_type()
                    );
                    classified[index] = Some(ClassifiedUtxo::not_token(utxo.clone()));
                }
            }
        }

        if !candidates.is_empty() {
            let token_ids: Vec<String> = candidates
                .iter()
                .map(|candidate| candidate.operation.token_id.clone())
                .collect();
            let metadata = self.metadata.resolve_many(&token_ids).await?;

            let txids = unique_in_order(candidates.iter().map(|c| c.operation.txid.as_str()));
            let verdicts: HashMap<String, Option<bool>> = txids
                .iter()
                .cloned()
                .zip(self.gate.validity(&txids).await?)
                .collect();

            for candidate in candidates {
                let utxo = &utxos[candidate.index];
                let Some(token) = metadata.get(&candidate.operation.token_id) else {
                    classified[candidate.index] = Some(ClassifiedUtxo::not_token(utxo.clone()));
                    continue;
                };
                let details = token_details(candidate.operation, token, candidate.role);
                let is_valid = verdicts
                    .get(&candidate.operation.txid)
                    .copied()
                    .flatten();
                classified[candidate.index] =
                    Some(ClassifiedUtxo::token(utxo.clone(), details, is_valid));
            }
        }

        let classified: Vec<ClassifiedUtxo> = classified
            .into_iter()
            .zip(utxos)
            .map(|(entry, utxo)| entry.unwrap_or_else(|| ClassifiedUtxo::not_token(utxo)))
            .collect();

        info!(
            "Classified {} UTXOs: {} token, {} quarantined",
            classified.len(),
            classified.iter().filter(|u| u.is_slp == Some(true)).count(),
            classified.iter().filter(|u| u.is_slp.is_none()).count()
        );

        Ok(classified)
    }

    /// Decode each distinct parent transaction once
    async fn probe_parents(
        &self,
        utxos: &[Utxo],
    ) -> AppResult<HashMap<String, Option<TokenOperation>>> {
        let parents = unique_in_order(utxos.iter().map(|utxo| utxo.txid.as_str()));

        let results: Vec<AppResult<Option<TokenOperation>>> = stream::iter(parents.iter())
            .map(|txid| self.classifier.probe_token_operation(txid))
            .buffered(self.concurrency)
            .collect()
            .await;

        parents
            .into_iter()
            .zip(results)
            .map(|(txid, result)| result.map(|operation| (txid, operation)))
            .collect()
    }
}

fn token_details(operation: &TokenOperation, token: &TokenMetadata, role: OutputRole) -> TokenUtxoDetails {
    let (utxo_type, raw_quantity, baton_still_exists) = match role {
        OutputRole::Token(raw) => (UtxoType::Token, Some(raw), None),
        OutputRole::MintBaton => {
            let alive = match &operation.details {
                OperationDetails::Mint(mint) => mint.baton_still_exists,
                _ => true,
            };
            (UtxoType::MintBaton, None, Some(alive))
        }
    };

    TokenUtxoDetails {
        utxo_type,
        transaction_type: operation.transaction_type(),
        token_type: operation.token_type,
        token_id: operation.token_id.clone(),
        token_ticker: token.ticker.clone(),
        token_name: token.name.clone(),
        token_document_url: token.document_uri.clone(),
        token_document_hash: token.document_hash.clone(),
        decimals: token.decimals,
        token_qty: raw_quantity
            .as_ref()
            .map(|raw| scale_quantity(raw, token.decimals)),
        token_qty_str: raw_quantity
            .as_ref()
            .map(|raw| format_quantity(raw, token.decimals)),
        raw_quantity,
        baton_still_exists,
    }
}
