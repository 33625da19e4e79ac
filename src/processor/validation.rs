//! Validation gate
//!
//! Wraps the token indexer's validity registry and the token blacklist.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{RawTransactionSource, ValidityOracle};
use crate::errors::AppResult;
use crate::processor::classifier::TokenClassifier;
use crate::types::validation::{normalize_validity, tri_state_validity};
use crate::types::ValidationResult;

pub struct ValidationGate<B: ?Sized> {
    backend: Arc<B>,
    classifier: TokenClassifier<B>,
    blacklist: Arc<HashSet<String>>,
}

impl<B: ?Sized> Clone for ValidationGate<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            classifier: self.classifier.clone(),
            blacklist: Arc::clone(&self.blacklist),
        }
    }
}

impl<B> ValidationGate<B>
where
    B: RawTransactionSource + ValidityOracle + ?Sized,
{
    /// `blacklist` holds lowercase token ids
    pub fn new(backend: Arc<B>, blacklist: HashSet<String>) -> Self {
        Self {
            classifier: TokenClassifier::new(Arc::clone(&backend)),
            backend,
            blacklist: Arc::new(blacklist),
        }
    }

    pub async fn validate_txid(&self, txid: &str) -> AppResult<ValidationResult> {
        let txids = [txid.to_string()];
        let mut results = self.validate_txids(&txids).await?;
        Ok(results.remove(0))
    }

    /// One verdict per txid, in query order; unknown txids are `valid: false`
    pub async fn validate_txids(&self, txids: &[String]) -> AppResult<Vec<ValidationResult>> {
        if txids.is_empty() {
            return Ok(Vec::new());
        }
        let entries = self.backend.check_txid_validity(txids).await?;
        Ok(normalize_validity(txids, &entries))
    }

    /// Tri-state verdicts: `None` while the indexer has not processed a txid
    pub async fn validity(&self, txids: &[String]) -> AppResult<Vec<Option<bool>>> {
        if txids.is_empty() {
            return Ok(Vec::new());
        }
        let entries = self.backend.check_txid_validity(txids).await?;
        debug!("Validity for {} txids received", txids.len());
        Ok(tri_state_validity(txids, &entries))
    }

    pub fn is_blacklisted_token(&self, token_id: &str) -> bool {
        self.blacklist.contains(&token_id.to_ascii_lowercase())
    }

    /// True when `txid` carries a blacklisted token; any failure reads as false
    pub async fn check_blacklist(&self, txid: &str) -> bool {
        if self.blacklist.is_empty() {
            return false;
        }

        match self.classifier.get_token_operation(txid).await {
            Ok(operation) => self.is_blacklisted_token(&operation.token_id),
            Err(e) => {
                warn!("Blacklist check for {} treated as not blacklisted: {}", txid, e);
                false
            }
        }
    }
}
