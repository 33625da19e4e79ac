//! UTXO records and their SLP classification
//!
//! Indexers disagree on field names; [`Utxo::from_json`] accepts the canonical
//! `txid`/`vout`/`satoshis` shape and the ElectrumX `tx_hash`/`tx_pos`/`value`
//! shape.

use bigdecimal::BigDecimal;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::token::TransactionType;
use crate::errors::{AppError, AppResult};
use crate::utils::amount::{serialize_biguint_opt, serialize_decimal_opt};

/// Canonical UTXO shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    pub txid: String,
    pub vout: u32,
    pub satoshis: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
}

impl Utxo {
    pub fn new(txid: impl Into<String>, vout: u32, satoshis: u64) -> Self {
        Self {
            txid: txid.into(),
            vout,
            satoshis,
            height: None,
        }
    }

    /// Normalise one indexer record; `index` is only used for error reporting
    pub fn from_json(index: usize, record: &Value) -> AppResult<Self> {
        let object = record.as_object().ok_or_else(|| AppError::MalformedUtxo {
            index,
            reason: "record is not an object".to_string(),
        })?;

        let txid = pick(object, "txid", "tx_hash")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::MalformedUtxo {
                index,
                reason: "missing txid/tx_hash".to_string(),
            })?
            .to_string();

        let vout = pick(object, "vout", "tx_pos")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| AppError::MalformedUtxo {
                index,
                reason: "missing vout/tx_pos".to_string(),
            })?;

        let satoshis = pick(object, "satoshis", "value")
            .and_then(Value::as_u64)
            .ok_or_else(|| AppError::MalformedUtxo {
                index,
                reason: "missing satoshis/value".to_string(),
            })?;

        let height = object.get("height").and_then(Value::as_u64);

        Ok(Self {
            txid,
            vout,
            satoshis,
            height,
        })
    }

    pub fn outpoint(&self) -> String {
        format!("{}:{}", self.txid, self.vout)
    }
}

/// Canonical field first, then its indexer synonym
fn pick<'a>(object: &'a Map<String, Value>, canonical: &str, synonym: &str) -> Option<&'a Value> {
    object
        .get(canonical)
        .filter(|v| !v.is_null())
        .or_else(|| object.get(synonym).filter(|v| !v.is_null()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UtxoType {
    Token,
    MintBaton,
}

/// Coarse view of a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlpStatus {
    /// Confirmed part of a token operation
    Token,
    /// Plain BCH
    NotToken,
    /// Parent transaction belongs to a blacklisted token
    Quarantined,
}

/// Token metadata attached to a token or mint-baton UTXO
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUtxoDetails {
    pub utxo_type: UtxoType,
    pub transaction_type: TransactionType,
    pub token_type: u16,
    pub token_id: String,
    pub token_ticker: String,
    pub token_name: String,
    pub token_document_url: String,
    pub token_document_hash: String,
    pub decimals: u8,
    #[serde(
        serialize_with = "serialize_biguint_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_quantity: Option<BigUint>,
    #[serde(
        serialize_with = "serialize_decimal_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub token_qty: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_qty_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baton_still_exists: Option<bool>,
}

/// UTXO annotated with its SLP classification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedUtxo {
    #[serde(flatten)]
    pub utxo: Utxo,
    /// `Some(true)` token, `Some(false)` plain BCH, `None` quarantined
    pub is_slp: Option<bool>,
    /// Indexer verdict; `None` while the indexer has not processed the txid
    pub is_valid: Option<bool>,
    #[serde(flatten)]
    pub token: Option<TokenUtxoDetails>,
}

impl ClassifiedUtxo {
    pub fn not_token(utxo: Utxo) -> Self {
        Self {
            utxo,
            is_slp: Some(false),
            is_valid: Some(false),
            token: None,
        }
    }

    pub fn quarantined(utxo: Utxo) -> Self {
        Self {
            utxo,
            is_slp: None,
            is_valid: None,
            token: None,
        }
    }

    pub fn token(utxo: Utxo, details: TokenUtxoDetails, is_valid: Option<bool>) -> Self {
        Self {
            utxo,
            is_slp: Some(true),
            is_valid,
            token: Some(details),
        }
    }

    pub fn status(&self) -> SlpStatus {
        match self.is_slp {
            Some(true) => SlpStatus::Token,
            Some(false) => SlpStatus::NotToken,
            None => SlpStatus::Quarantined,
        }
    }

    /// Safe to spend as plain BCH without burning tokens
    pub fn is_spendable_as_bch(&self) -> bool {
        self.status() == SlpStatus::NotToken
    }
}
