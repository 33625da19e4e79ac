use bitcoin::Txid;
use std::str::FromStr;

use crate::errors::{ApiError, ApiResult};

/// Check a txid is 64 hex characters before it reaches a URL
pub fn validate_txid(txid: &str) -> ApiResult<()> {
    Txid::from_str(txid)
        .map(|_| ())
        .map_err(|_| ApiError::InvalidTxid {
            txid: txid.to_string(),
        })
}

pub fn is_txid(txid: &str) -> bool {
    validate_txid(txid).is_ok()
}
