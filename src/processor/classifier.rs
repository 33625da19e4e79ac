//! Token transaction classifier
//!
//! Fetches a transaction, decodes the OP_RETURN at vout 0 and resolves the
//! addresses the token operation refers to from the same transaction.

use std::sync::Arc;
use tracing::debug;

use crate::api::RawTransactionSource;
use crate::decoder::{parse_token_script_hex, ParseError, ParseResult};
use crate::errors::AppResult;
use crate::types::{
    GenesisOperation, MintOperation, OperationDetails, RawTransaction, SendOperation, SendOutput,
    SlpMessage, TokenOperation,
};

/// Build the token operation for an already fetched transaction
pub fn operation_from_transaction(transaction: &RawTransaction) -> ParseResult<TokenOperation> {
    let script_hex = transaction
        .output_script_hex(0)
        .ok_or(ParseError::NotOpReturn)?;
    let parsed = parse_token_script_hex(script_hex)?;

    let (token_id, details) = match parsed.message {
        SlpMessage::Genesis(genesis) => {
            let baton_holder_address = genesis
                .mint_baton_vout
                .and_then(|vout| transaction.output_address(u32::from(vout)));
            let details = OperationDetails::Genesis(GenesisOperation {
                ticker: genesis.ticker,
                name: genesis.name,
                document_uri: genesis.document_uri,
                document_hash: genesis.document_hash,
                decimals: genesis.decimals,
                mint_baton_vout: genesis.mint_baton_vout,
                initial_quantity: genesis.initial_quantity,
                recipient_address: transaction.output_address(1),
                baton_holder_address,
            });
            (transaction.txid.clone(), details)
        }
        SlpMessage::Mint(mint) => {
            // A baton sent to vout 0 or 1 can no longer mint
            let baton_still_exists = mint.mint_baton_vout.is_some_and(|vout| vout > 1);
            let baton_holder_address = if baton_still_exists {
                mint.mint_baton_vout
                    .and_then(|vout| transaction.output_address(u32::from(vout)))
            } else {
                None
            };
            let details = OperationDetails::Mint(MintOperation {
                mint_baton_vout: mint.mint_baton_vout,
                baton_still_exists,
                quantity: mint.quantity,
                recipient_address: transaction.output_address(1),
                baton_holder_address,
            });
            (mint.token_id, details)
        }
        SlpMessage::Send(send) => {
            let send_outputs = send
                .amounts
                .into_iter()
                .zip(1u32..)
                .map(|(raw_quantity, vout)| SendOutput {
                    vout,
                    raw_quantity,
                    recipient_address: transaction.output_address(vout),
                })
                .collect();
            (
                send.token_id,
                OperationDetails::Send(SendOperation { send_outputs }),
            )
        }
    };

    Ok(TokenOperation {
        txid: transaction.txid.clone(),
        token_type: parsed.token_type,
        token_id,
        details,
    })
}

/// Classifies transactions by txid through a raw transaction backend
pub struct TokenClassifier<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: ?Sized> Clone for TokenClassifier<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B> TokenClassifier<B>
where
    B: RawTransactionSource + ?Sized,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Decode the token operation of `txid`
    ///
    /// Fails with `AppError::Decode` when the transaction is not SLP.
    pub async fn get_token_operation(&self, txid: &str) -> AppResult<TokenOperation> {
        let transaction = self.backend.raw_transaction(txid).await?;
        Ok(operation_from_transaction(&transaction)?)
    }

    /// Like [`get_token_operation`](Self::get_token_operation), with "not SLP" as `Ok(None)`
    pub async fn probe_token_operation(&self, txid: &str) -> AppResult<Option<TokenOperation>> {
        let (_, operation) = self.fetch_and_probe(txid).await?;
        Ok(operation)
    }

    /// Fetch the transaction and decode it if it is SLP
    pub async fn fetch_and_probe(
        &self,
        txid: &str,
    ) -> AppResult<(RawTransaction, Option<TokenOperation>)> {
        let transaction = self.backend.raw_transaction(txid).await?;
        let operation = probe(&transaction);
        Ok((transaction, operation))
    }
}

/// "Not SLP" reasons become `None`
pub(crate) fn probe(transaction: &RawTransaction) -> Option<TokenOperation> {
    match operation_from_transaction(transaction) {
        Ok(operation) => Some(operation),
        Err(reason) => {
            debug!("{} is not SLP: {}", transaction.txid, reason);
            None
        }
    }
}
