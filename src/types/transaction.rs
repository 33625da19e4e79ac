//! Raw and hydrated transaction records
//!
//! Raw records mirror the verbose JSON a full node returns. Fields this crate
//! does not interpret are kept in `extra` so a hydrated transaction still
//! carries the complete upstream record.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::token::TransactionType;
use crate::utils::amount::serialize_decimal_opt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPubKey {
    #[serde(default)]
    pub hex: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
    /// Newer nodes report a single `address` instead of `addresses`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScriptPubKey {
    pub fn first_address(&self) -> Option<&str> {
        self.addresses
            .first()
            .map(String::as_str)
            .or(self.address.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutput {
    #[serde(default)]
    pub n: u32,
    pub script_pub_key: ScriptPubKey,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawOutput {
    /// Output value exactly as the node reported it
    pub fn value(&self) -> Option<&Value> {
        self.extra.get("value")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInput {
    /// Absent on coinbase inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawInput {
    /// Previous outpoint, `None` for coinbase inputs
    pub fn previous_output(&self) -> Option<(&str, u32)> {
        match (&self.txid, self.vout) {
            (Some(txid), Some(vout)) => Some((txid.as_str(), vout)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub txid: String,
    #[serde(default)]
    pub vin: Vec<RawInput>,
    #[serde(default)]
    pub vout: Vec<RawOutput>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawTransaction {
    /// Output script bytes (hex) at the given index
    pub fn output_script_hex(&self, vout: usize) -> Option<&str> {
        self.vout
            .get(vout)
            .map(|output| output.script_pub_key.hex.as_str())
    }

    /// Mined into a block; only confirmed records are immutable
    pub fn is_confirmed(&self) -> bool {
        let in_block = self
            .extra
            .get("blockhash")
            .and_then(Value::as_str)
            .is_some_and(|hash| !hash.is_empty());
        let confirmations = self
            .extra
            .get("confirmations")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        in_block || confirmations > 0
    }

    pub fn output_address(&self, vout: u32) -> Option<String> {
        self.vout
            .get(vout as usize)
            .and_then(|output| output.script_pub_key.first_address())
            .map(str::to_string)
    }
}

/// Token amount annotation on a hydrated input or output
///
/// Present only on transactions that decode as SLP. `token_qty` is `None` when
/// the slot takes no part in the token transfer, which differs from zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSlot {
    #[serde(serialize_with = "serialize_decimal_opt")]
    pub token_qty: Option<BigDecimal>,
    pub token_qty_str: Option<String>,
}

impl TokenSlot {
    pub fn empty() -> Self {
        Self {
            token_qty: None,
            token_qty_str: None,
        }
    }

    pub fn amount(value: BigDecimal, formatted: String) -> Self {
        Self {
            token_qty: Some(value),
            token_qty_str: Some(formatted),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedInput {
    #[serde(flatten)]
    pub input: RawInput,
    /// Address of the spent output
    pub address: Option<String>,
    /// Value of the spent output as reported upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub token: Option<TokenSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedOutput {
    #[serde(flatten)]
    pub output: RawOutput,
    #[serde(flatten)]
    pub token: Option<TokenSlot>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_mint_baton: bool,
}

/// Token-level fields stamped on an SLP transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub token_tx_type: TransactionType,
    pub token_id: String,
    pub token_ticker: String,
    pub token_name: String,
    pub token_decimals: u8,
    pub token_uri: String,
    pub token_doc_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedTransaction {
    pub txid: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub vin: Vec<HydratedInput>,
    pub vout: Vec<HydratedOutput>,
    #[serde(flatten)]
    pub token: Option<TokenSummary>,
    #[serde(rename = "isValidSLPTx")]
    pub is_valid_slp_tx: bool,
}

impl HydratedTransaction {
    pub fn is_token_transaction(&self) -> bool {
        self.token.is_some()
    }
}
