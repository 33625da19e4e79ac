//! Transaction hydrator
//!
//! Expands one transaction into a wallet-facing view: every input carries the
//! address it spends from and, for SLP transactions, every input and output
//! carries the token amount it moves.

use futures::stream::{self, StreamExt};
use num_bigint::BigUint;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::SlpBackend;
use crate::errors::AppResult;
use crate::processor::classifier::{probe, TokenClassifier};
use crate::processor::metadata::MetadataResolver;
use crate::processor::unique_in_order;
use crate::processor::validation::ValidationGate;
use crate::types::{
    HydratedInput, HydratedOutput, HydratedTransaction, OutputRole, RawTransaction, TokenMetadata,
    TokenOperation, TokenSlot, TokenSummary,
};
use crate::utils::amount::{format_quantity, scale_quantity};

pub struct TransactionHydrator<B: ?Sized> {
    backend: Arc<B>,
    classifier: TokenClassifier<B>,
    metadata: MetadataResolver<B>,
    gate: ValidationGate<B>,
    concurrency: usize,
}

impl<B> TransactionHydrator<B>
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

    /// Hydrate `txid`
    ///
    /// A transaction that is not SLP comes back without token fields and with
    /// `is_valid_slp_tx = false`. Validation failures, rate limiting included,
    /// are returned as errors.
    pub async fn hydrate_transaction(&self, txid: &str) -> AppResult<HydratedTransaction> {
        let (transaction, operation) = self.classifier.fetch_and_probe(txid).await?;
        let parents = self.fetch_parents(&transaction).await?;

        let Some(operation) = operation else {
            debug!("{} hydrated without token data", txid);
            return Ok(plain_view(transaction, &parents));
        };

        let token = self.metadata.resolve(&operation.token_id).await?;
        let validation = self.gate.validate_txid(txid).await?;

        let hydrated = token_view(transaction, &parents, &operation, &token, validation.valid);
        info!(
            "Hydrated {} {} of token {} (valid: {})",
            operation.transaction_type(),
            txid,
            operation.token_id,
            hydrated.is_valid_slp_tx
        );
        Ok(hydrated)
    }

    /// Parent transaction of every non-coinbase input, each fetched once
    async fn fetch_parents(
        &self,
        transaction: &RawTransaction,
    ) -> AppResult<HashMap<String, RawTransaction>> {
        let parent_txids = unique_in_order(
            transaction
                .vin
                .iter()
                .filter_map(|input| input.previous_output().map(|(txid, _)| txid)),
        );

        let results: Vec<AppResult<RawTransaction>> = stream::iter(parent_txids.iter())
            .map(|parent| self.backend.raw_transaction(parent))
            .buffered(self.concurrency)
            .map(|result| result.map_err(Into::into))
            .collect()
            .await;

        parent_txids
            .into_iter()
            .zip(results)
            .map(|(parent_txid, result)| result.map(|parent| (parent_txid, parent)))
            .collect()
    }
}

/// `token_slot` receives the spent parent output, `None` for coinbase inputs
fn hydrate_inputs<F>(
    transaction: &RawTransaction,
    parents: &HashMap<String, RawTransaction>,
    token_slot: F,
) -> Vec<HydratedInput>
where
    F: Fn(Option<(&RawTransaction, u32)>) -> Option<TokenSlot>,
{
    transaction
        .vin
        .iter()
        .map(|input| {
            let spent = input
                .previous_output()
                .and_then(|(txid, vout)| parents.get(txid).map(|parent| (parent, vout)));
            HydratedInput {
                input: input.clone(),
                address: spent.and_then(|(parent, vout)| parent.output_address(vout)),
                value: spent.and_then(|(parent, vout)| {
                    parent
                        .vout
                        .get(vout as usize)
                        .and_then(|output| output.value().cloned())
                }),
                token: token_slot(spent),
            }
        })
        .collect()
}

fn plain_view(
    transaction: RawTransaction,
    parents: &HashMap<String, RawTransaction>,
) -> HydratedTransaction {
    let vin = hydrate_inputs(&transaction, parents, |_| None);
    let vout = transaction
        .vout
        .into_iter()
        .map(|output| HydratedOutput {
            output,
            token: None,
            is_mint_baton: false,
        })
        .collect();

    HydratedTransaction {
        txid: transaction.txid,
        extra: transaction.extra,
        vin,
        vout,
        token: None,
        is_valid_slp_tx: false,
    }
}

fn token_view(
    transaction: RawTransaction,
    parents: &HashMap<String, RawTransaction>,
    operation: &TokenOperation,
    token: &TokenMetadata,
    is_valid: bool,
) -> HydratedTransaction {
    let amount = |raw: &BigUint| {
        TokenSlot::amount(
            scale_quantity(raw, token.decimals),
            format_quantity(raw, token.decimals),
        )
    };

    // Inputs only count when they spend a token output of the same token
    let vin = hydrate_inputs(&transaction, parents, |spent| {
        let Some((parent, vout)) = spent else {
            return Some(TokenSlot::empty());
        };
        let slot = probe(parent)
            .filter(|parent_op| parent_op.token_id == operation.token_id)
            .and_then(|parent_op| match parent_op.output_role(vout) {
                Some(OutputRole::Token(raw)) => Some(amount(&raw)),
                _ => None,
            })
            .unwrap_or_else(TokenSlot::empty);
        Some(slot)
    });

    let vout = transaction
        .vout
        .into_iter()
        .enumerate()
        .map(|(index, output)| {
            let role = operation.output_role(index as u32);
            HydratedOutput {
                output,
                token: Some(match &role {
                    Some(OutputRole::Token(raw)) => amount(raw),
                    _ => TokenSlot::empty(),
                }),
                is_mint_baton: role == Some(OutputRole::MintBaton),
            }
        })
        .collect();

    HydratedTransaction {
        txid: transaction.txid,
        extra: transaction.extra,
        vin,
        vout,
        token: Some(TokenSummary {
            token_tx_type: operation.transaction_type(),
            token_id: operation.token_id.clone(),
            token_ticker: token.ticker.clone(),
            token_name: token.name.clone(),
            token_decimals: token.decimals,
            token_uri: token.document_uri.clone(),
            token_doc_hash: token.document_hash.clone(),
        }),
        is_valid_slp_tx: is_valid,
    }
}
