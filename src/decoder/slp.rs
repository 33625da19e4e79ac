//! SLP Type-1 OP_RETURN parser
//!
//! Decodes output scripts according to the Simple Ledger Protocol token type 1
//! layout: https://github.com/simpleledger/slp-specifications/blob/master/slp-token-type-1.md
//!
//! Item 0 is OP_RETURN, 1 the lokad id, 2 the token type, 3 the transaction
//! type; the remaining items are positional per transaction type.
use num_bigint::BigUint;
use tracing::debug;

use super::error::{ParseError, ParseResult};
use super::script::ScriptCursor;
use crate::types::token::constants::{
    DOCUMENT_HASH_LEN, MAX_DECIMALS, MAX_SEND_OUTPUTS, QUANTITY_LEN, SLP_LOKAD_ID,
    TOKEN_ID_LEN, TOKEN_TYPE_FUNGIBLE,
};
use crate::types::token::{
    GenesisMessage, MintMessage, ParsedScript, SendMessage, SlpMessage, TransactionType,
};

/// Parse raw output script bytes into an SLP message
pub fn parse_token_script(script: &[u8]) -> ParseResult<ParsedScript> {
    let mut cursor = ScriptCursor::new(script);
    cursor.expect_op_return()?;

    let lokad = cursor.next_push().map_err(|_| ParseError::NotSlpOpReturn)?;
    if lokad.as_deref() != Some(SLP_LOKAD_ID) {
        return Err(ParseError::NotSlpOpReturn);
    }

    let token_type = parse_token_type(&cursor.required_push("token_type")?)?;

    let type_field = cursor.required_push("transaction_type")?;
    let transaction_type = TransactionType::from_field(&type_field).ok_or_else(|| {
        ParseError::UnknownTransactionType(String::from_utf8_lossy(&type_field).into_owned())
    })?;

    let message = match transaction_type {
        TransactionType::Genesis => SlpMessage::Genesis(parse_genesis(&mut cursor)?),
        TransactionType::Mint => SlpMessage::Mint(parse_mint(&mut cursor)?),
        TransactionType::Send => SlpMessage::Send(parse_send(&mut cursor)?),
    };

    debug!(
        "Decoded SLP {} (token type {})",
        transaction_type, token_type
    );

    Ok(ParsedScript {
        token_type,
        message,
    })
}

/// Parse a hex-encoded output script
pub fn parse_token_script_hex(script_hex: &str) -> ParseResult<ParsedScript> {
    let script = hex::decode(script_hex).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
    parse_token_script(&script)
}

/// Token type is a 1 or 2 byte big-endian integer; only type 1 is decoded
fn parse_token_type(field: &[u8]) -> ParseResult<u16> {
    let token_type = match field {
        [b] => u16::from(*b),
        [hi, lo] => u16::from_be_bytes([*hi, *lo]),
        _ => {
            return Err(ParseError::InvalidField {
                field: "token_type",
                reason: format!("expected 1 or 2 bytes, got {}", field.len()),
            })
        }
    };

    if token_type != TOKEN_TYPE_FUNGIBLE {
        return Err(ParseError::UnknownTokenType(token_type));
    }
    Ok(token_type)
}

fn parse_genesis(cursor: &mut ScriptCursor<'_>) -> ParseResult<GenesisMessage> {
    let ticker = text_field(cursor.required_push("ticker")?);
    let name = text_field(cursor.required_push("name")?);
    let document_uri = text_field(cursor.required_push("document_uri")?);

    let document_hash = cursor.required_push("document_hash")?;
    if !document_hash.is_empty() && document_hash.len() != DOCUMENT_HASH_LEN {
        return Err(ParseError::InvalidField {
            field: "document_hash",
            reason: format!("expected 0 or 32 bytes, got {}", document_hash.len()),
        });
    }

    let decimals = match cursor.required_push("decimals")?.as_slice() {
        [d] if *d <= MAX_DECIMALS => *d,
        other => {
            return Err(ParseError::InvalidField {
                field: "decimals",
                reason: format!("expected one byte in 0..=9, got {}", hex::encode(other)),
            })
        }
    };

    let mint_baton_vout = baton_vout_field(cursor.required_push("mint_baton_vout")?)?;
    // vout 1 always receives the initial quantity
    if mint_baton_vout == Some(1) {
        return Err(ParseError::InvalidField {
            field: "mint_baton_vout",
            reason: "GENESIS baton cannot share vout 1 with the initial quantity".to_string(),
        });
    }
    let initial_quantity = quantity_field("initial_quantity", &cursor.required_push("initial_quantity")?)?;

    Ok(GenesisMessage {
        ticker,
        name,
        document_uri,
        document_hash: hex::encode(document_hash),
        decimals,
        mint_baton_vout,
        initial_quantity,
    })
}

fn parse_mint(cursor: &mut ScriptCursor<'_>) -> ParseResult<MintMessage> {
    let token_id = token_id_field(cursor.required_push("token_id")?)?;
    let mint_baton_vout = baton_vout_field(cursor.required_push("mint_baton_vout")?)?;
    let quantity = quantity_field("additional_quantity", &cursor.required_push("additional_quantity")?)?;

    Ok(MintMessage {
        token_id,
        mint_baton_vout,
        quantity,
    })
}

fn parse_send(cursor: &mut ScriptCursor<'_>) -> ParseResult<SendMessage> {
    let token_id = token_id_field(cursor.required_push("token_id")?)?;

    let mut amounts = Vec::new();
    while let Some(field) = cursor.next_push()? {
        amounts.push(quantity_field("token_output_quantity", &field)?);
    }

    if amounts.is_empty() {
        return Err(ParseError::MissingField("token_output_quantity"));
    }
    if amounts.len() > MAX_SEND_OUTPUTS {
        return Err(ParseError::InvalidField {
            field: "token_output_quantity",
            reason: format!("{} amounts exceed the limit of {}", amounts.len(), MAX_SEND_OUTPUTS),
        });
    }

    Ok(SendMessage { token_id, amounts })
}

fn text_field(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

fn token_id_field(bytes: Vec<u8>) -> ParseResult<String> {
    if bytes.len() != TOKEN_ID_LEN {
        return Err(ParseError::InvalidField {
            field: "token_id",
            reason: format!("expected 32 bytes, got {}", bytes.len()),
        });
    }
    Ok(hex::encode(bytes))
}

/// Empty or zero means no baton
fn baton_vout_field(bytes: Vec<u8>) -> ParseResult<Option<u8>> {
    match bytes.as_slice() {
        [] | [0] => Ok(None),
        [vout] => Ok(Some(*vout)),
        other => Err(ParseError::InvalidField {
            field: "mint_baton_vout",
            reason: format!("expected 0 or 1 bytes, got {}", other.len()),
        }),
    }
}

/// Quantities are unsigned big-endian integers
fn quantity_field(field: &'static str, bytes: &[u8]) -> ParseResult<BigUint> {
    if bytes.len() != QUANTITY_LEN {
        return Err(ParseError::InvalidField {
            field,
            reason: format!("expected 8 bytes, got {}", bytes.len()),
        });
    }
    Ok(BigUint::from_bytes_be(bytes))
}
