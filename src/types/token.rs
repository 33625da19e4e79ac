//! SLP token operation model
//!
//! Two layers: the script-level [`SlpMessage`] produced by the OP_RETURN
//! parser, and the transaction-level [`TokenOperation`] produced by the
//! classifier once the txid and output addresses are known.
//!
//! Quantities are always carried as raw on-chain integers. Decimal-adjusted
//! values are derived on demand through [`crate::utils::amount`].

use bigdecimal::BigDecimal;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::amount::{scale_quantity, serialize_biguint};

/// SLP constants
pub mod constants {
    /// Lokad id pushed right after OP_RETURN
    pub const SLP_LOKAD_ID: &[u8] = b"SLP\0";

    /// Fungible Type-1 token
    pub const TOKEN_TYPE_FUNGIBLE: u16 = 0x01;

    pub const MAX_DECIMALS: u8 = 9;

    /// Quantity fields are 8-byte big-endian integers
    pub const QUANTITY_LEN: usize = 8;

    pub const TOKEN_ID_LEN: usize = 32;

    pub const DOCUMENT_HASH_LEN: usize = 32;

    /// SEND may address at most vouts 1..=19
    pub const MAX_SEND_OUTPUTS: usize = 19;
}

/// SLP transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Genesis,
    Mint,
    Send,
}

impl TransactionType {
    /// Case-insensitive match against the ASCII transaction type field
    pub fn from_field(field: &[u8]) -> Option<Self> {
        match field.to_ascii_uppercase().as_slice() {
            b"GENESIS" => Some(Self::Genesis),
            b"MINT" => Some(Self::Mint),
            b"SEND" => Some(Self::Send),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Genesis => "GENESIS",
            Self::Mint => "MINT",
            Self::Send => "SEND",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// GENESIS fields as they appear in the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisMessage {
    pub ticker: String,
    pub name: String,
    pub document_uri: String,
    /// Hex of the 32-byte document hash, empty when absent
    pub document_hash: String,
    pub decimals: u8,
    /// `None` means the token is fixed-supply
    pub mint_baton_vout: Option<u8>,
    #[serde(serialize_with = "serialize_biguint")]
    pub initial_quantity: BigUint,
}

/// MINT fields as they appear in the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintMessage {
    pub token_id: String,
    pub mint_baton_vout: Option<u8>,
    #[serde(serialize_with = "serialize_biguint")]
    pub quantity: BigUint,
}

/// SEND fields as they appear in the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub token_id: String,
    /// Amount for vout `i + 1`
    #[serde(serialize_with = "crate::utils::amount::serialize_biguint_vec")]
    pub amounts: Vec<BigUint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "transactionType", rename_all = "UPPERCASE")]
pub enum SlpMessage {
    Genesis(GenesisMessage),
    Mint(MintMessage),
    Send(SendMessage),
}

/// Decoded SLP OP_RETURN
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScript {
    pub token_type: u16,
    #[serde(flatten)]
    pub message: SlpMessage,
}

impl ParsedScript {
    pub fn transaction_type(&self) -> TransactionType {
        match self.message {
            SlpMessage::Genesis(_) => TransactionType::Genesis,
            SlpMessage::Mint(_) => TransactionType::Mint,
            SlpMessage::Send(_) => TransactionType::Send,
        }
    }
}

/// GENESIS resolved against its transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisOperation {
    pub ticker: String,
    pub name: String,
    pub document_uri: String,
    pub document_hash: String,
    pub decimals: u8,
    pub mint_baton_vout: Option<u8>,
    #[serde(serialize_with = "serialize_biguint")]
    pub initial_quantity: BigUint,
    /// Holder of vout 1
    pub recipient_address: Option<String>,
    /// Holder of the baton vout; `None` with no baton vout means never created
    pub baton_holder_address: Option<String>,
}

impl GenesisOperation {
    /// Initial supply scaled by `10^-decimals`
    pub fn initial_amount(&self) -> BigDecimal {
        scale_quantity(&self.initial_quantity, self.decimals)
    }

    pub fn baton_created(&self) -> bool {
        self.mint_baton_vout.is_some()
    }
}

/// MINT resolved against its transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintOperation {
    pub mint_baton_vout: Option<u8>,
    /// Baton passed to vout > 1; otherwise it was destroyed
    pub baton_still_exists: bool,
    /// Raw minted amount; decimals come from the token's GENESIS
    #[serde(serialize_with = "serialize_biguint")]
    pub quantity: BigUint,
    pub recipient_address: Option<String>,
    /// Only set while the baton survives
    pub baton_holder_address: Option<String>,
}

/// One SEND amount field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutput {
    pub vout: u32,
    #[serde(serialize_with = "serialize_biguint")]
    pub raw_quantity: BigUint,
    pub recipient_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOperation {
    pub send_outputs: Vec<SendOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "transactionType", rename_all = "UPPERCASE")]
pub enum OperationDetails {
    Genesis(GenesisOperation),
    Mint(MintOperation),
    Send(SendOperation),
}

/// Role a transaction output plays in a token operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRole {
    /// Output carries this raw token amount
    Token(BigUint),
    MintBaton,
}

/// SLP operation carried by one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenOperation {
    pub txid: String,
    pub token_type: u16,
    /// For GENESIS this is the transaction's own id
    pub token_id: String,
    #[serde(flatten)]
    pub details: OperationDetails,
}

impl TokenOperation {
    pub fn transaction_type(&self) -> TransactionType {
        match self.details {
            OperationDetails::Genesis(_) => TransactionType::Genesis,
            OperationDetails::Mint(_) => TransactionType::Mint,
            OperationDetails::Send(_) => TransactionType::Send,
        }
    }

    /// Decimals are only known locally for GENESIS
    pub fn decimals(&self) -> Option<u8> {
        match &self.details {
            OperationDetails::Genesis(genesis) => Some(genesis.decimals),
            _ => None,
        }
    }

    /// What the given vout represents, `None` when it is outside the recipient set
    pub fn output_role(&self, vout: u32) -> Option<OutputRole> {
        match &self.details {
            OperationDetails::Genesis(genesis) => {
                if vout == 1 {
                    Some(OutputRole::Token(genesis.initial_quantity.clone()))
                } else if genesis.mint_baton_vout.map(u32::from) == Some(vout) {
                    Some(OutputRole::MintBaton)
                } else {
                    None
                }
            }
            OperationDetails::Mint(mint) => {
                if vout == 1 {
                    Some(OutputRole::Token(mint.quantity.clone()))
                } else if mint.baton_still_exists
                    && mint.mint_baton_vout.map(u32::from) == Some(vout)
                {
                    Some(OutputRole::MintBaton)
                } else {
                    None
                }
            }
            OperationDetails::Send(send) => send
                .send_outputs
                .iter()
                .find(|output| output.vout == vout)
                .map(|output| OutputRole::Token(output.raw_quantity.clone())),
        }
    }

    pub fn mint_baton_vout(&self) -> Option<u32> {
        match &self.details {
            OperationDetails::Genesis(genesis) => genesis.mint_baton_vout.map(u32::from),
            OperationDetails::Mint(mint) if mint.baton_still_exists => {
                mint.mint_baton_vout.map(u32::from)
            }
            _ => None,
        }
    }
}
